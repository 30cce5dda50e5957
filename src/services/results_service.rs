use crate::config::{ScoreWeighting, VotingConfig};
use crate::entities::{location_entity as locations, vote_entity as votes};
use crate::error::AppResult;
use crate::models::ResultRow;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone)]
pub struct ResultsService {
    pool: DatabaseConnection,
    weighting: ScoreWeighting,
    comment_separator: String,
}

impl ResultsService {
    pub fn new(pool: DatabaseConnection, voting: &VotingConfig) -> Self {
        Self {
            pool,
            weighting: voting.weighting,
            comment_separator: voting.comment_separator.clone(),
        }
    }

    /// 读取全部投票并按地点汇总，按排名升序返回
    pub async fn results(&self) -> AppResult<Vec<ResultRow>> {
        let vote_list = votes::Entity::find()
            .order_by_asc(votes::Column::Id)
            .all(&self.pool)
            .await?;

        if vote_list.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<i32> = vote_list.iter().map(|v| v.location_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let location_list = locations::Entity::find()
            .filter(locations::Column::Id.is_in(ids))
            .all(&self.pool)
            .await?;

        Ok(aggregate(
            &vote_list,
            &location_list,
            self.weighting,
            &self.comment_separator,
        ))
    }
}

#[derive(Default)]
struct Tally {
    votes: u32,
    points: i64,
    per_points: [u32; 3],
    comments: Vec<String>,
}

/// 按地点汇总投票
///
/// - 只包含至少有一票的地点
/// - 评论按投票写入顺序拼接，无评论为 None
/// - 排序: punten_totaal 降序，其次 aantal_3、aantal_2 降序，最后 locatie_id 升序
/// - positie 从 1 开始连续编号
pub fn aggregate(
    vote_list: &[votes::Model],
    location_list: &[locations::Model],
    weighting: ScoreWeighting,
    separator: &str,
) -> Vec<ResultRow> {
    let by_id: HashMap<i32, &locations::Model> =
        location_list.iter().map(|l| (l.id, l)).collect();

    let mut tallies: BTreeMap<i32, Tally> = BTreeMap::new();
    for vote in vote_list {
        let tally = tallies.entry(vote.location_id).or_default();
        tally.votes += 1;
        tally.points += i64::from(vote.points);
        if let Some(slot) = usize::try_from(vote.points - 1)
            .ok()
            .and_then(|i| tally.per_points.get_mut(i))
        {
            *slot += 1;
        }
        if let Some(comment) = vote.comment.as_deref().filter(|c| !c.is_empty()) {
            tally.comments.push(comment.to_string());
        }
    }

    let mut rows: Vec<ResultRow> = tallies
        .into_iter()
        .map(|(location_id, tally)| {
            let (name, artist, weight) = match by_id.get(&location_id) {
                Some(l) => (l.name.clone(), l.artist.clone(), l.weight),
                None => {
                    log::warn!("Votes reference missing location {location_id}");
                    (String::new(), String::new(), 1.0)
                }
            };
            let raw = tally.points as f64;
            let punten_totaal = match weighting {
                ScoreWeighting::Unweighted => raw,
                ScoreWeighting::Multiply => raw * weight,
            };
            ResultRow {
                positie: 0,
                locatie_id: location_id,
                locatie: name,
                artiest: artist,
                wegingsfactor: weight,
                stemmen_aantal: tally.votes,
                punten_totaal,
                aantal_3: tally.per_points[2],
                aantal_2: tally.per_points[1],
                aantal_1: tally.per_points[0],
                toelichting_bundel: (!tally.comments.is_empty())
                    .then(|| tally.comments.join(separator)),
            }
        })
        .collect();

    rows.sort_by(rank_order);
    for (i, row) in rows.iter_mut().enumerate() {
        row.positie = i as u32 + 1;
    }
    rows
}

fn rank_order(a: &ResultRow, b: &ResultRow) -> Ordering {
    b.punten_totaal
        .total_cmp(&a.punten_totaal)
        .then_with(|| b.aantal_3.cmp(&a.aantal_3))
        .then_with(|| b.aantal_2.cmp(&a.aantal_2))
        .then_with(|| a.locatie_id.cmp(&b.locatie_id))
}
