use crate::entities::{
    event_entity as events, location_entity as locations, submission_entity as submissions,
    vote_entity as votes,
};
use crate::error::{AppError, AppResult};
use crate::models::{SelectionInput, ValidatedSelection};
use crate::utils::generate_submission_token;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashSet;

/// 每种选择数量对应的标准分值集合 (升序) 及其提示文本
pub fn canonical_points(count: usize) -> Option<(&'static [i32], &'static str)> {
    match count {
        1 => Some((&[3], "3")),
        2 => Some((&[2, 3], "3 and 2")),
        3 => Some((&[1, 2, 3], "3, 2 and 1")),
        _ => None,
    }
}

/// 校验一次投票的选择列表
///
/// 顺序: 数量 → 地点唯一 → 分值集合，遇到第一个错误即返回。
/// 通过后返回原顺序的选择，comment 去除首尾空白，空白评论变为 None。
pub fn validate_selections(selections: &[SelectionInput]) -> AppResult<Vec<ValidatedSelection>> {
    let (expected, label) = canonical_points(selections.len()).ok_or(AppError::InvalidCount)?;

    let mut seen = HashSet::with_capacity(selections.len());
    if !selections.iter().all(|s| seen.insert(s.location_id)) {
        return Err(AppError::DuplicateLocation);
    }

    let mut points: Vec<i32> = selections.iter().map(|s| s.points).collect();
    points.sort_unstable();
    if points != expected {
        return Err(AppError::InvalidPointAssignment(label));
    }

    Ok(selections
        .iter()
        .map(|s| ValidatedSelection {
            location_id: s.location_id,
            points: s.points,
            comment: normalize_comment(s.comment.as_deref()),
        })
        .collect())
}

/// 去除首尾空白，空串视为无评论
pub fn normalize_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

#[derive(Clone)]
pub struct VoteService {
    pool: DatabaseConnection,
    require_active_event: bool,
}

impl VoteService {
    pub fn new(pool: DatabaseConnection, require_active_event: bool) -> Self {
        Self {
            pool,
            require_active_event,
        }
    }

    /// 提交投票:
    /// 1. 校验选择列表
    /// 2. 解析当前活动轮次 (启用轮次限定时必须存在)
    /// 3. 校验所选地点存在且属于该轮次
    /// 4. 同一事务内写入 submission 与全部 vote
    ///
    /// 返回新建的 submission id
    pub async fn submit(&self, selections: &[SelectionInput]) -> AppResult<i32> {
        let validated = validate_selections(selections)?;

        let event_id = if self.require_active_event {
            let event = find_active_event(&self.pool)
                .await?
                .ok_or(AppError::NoActiveEvent)?;
            Some(event.id)
        } else {
            None
        };

        self.ensure_locations(&validated, event_id).await?;

        let submission_id = self
            .persist(event_id, &validated)
            .await
            .map_err(|e| AppError::StorageWriteFailure(e.to_string()))?;

        log::info!(
            "Stored submission {} with {} vote(s) (event: {:?})",
            submission_id,
            validated.len(),
            event_id
        );
        Ok(submission_id)
    }

    async fn ensure_locations(
        &self,
        selections: &[ValidatedSelection],
        event_id: Option<i32>,
    ) -> AppResult<()> {
        let ids: Vec<i32> = selections.iter().map(|s| s.location_id).collect();
        let mut query = locations::Entity::find().filter(locations::Column::Id.is_in(ids));
        if let Some(event_id) = event_id {
            query = query.filter(locations::Column::EventId.eq(event_id));
        }
        let known: HashSet<i32> = query
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|l| l.id)
            .collect();

        match selections.iter().find(|s| !known.contains(&s.location_id)) {
            Some(missing) => Err(AppError::UnknownLocation(missing.location_id)),
            None => Ok(()),
        }
    }

    async fn persist(
        &self,
        event_id: Option<i32>,
        selections: &[ValidatedSelection],
    ) -> Result<i32, sea_orm::DbErr> {
        let txn = self.pool.begin().await?;

        let submission = submissions::ActiveModel {
            event_id: Set(event_id),
            submission_token: Set(generate_submission_token()),
            submitted_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let rows = selections.iter().map(|s| votes::ActiveModel {
            submission_id: Set(submission.id),
            location_id: Set(s.location_id),
            points: Set(s.points),
            comment: Set(s.comment.clone()),
            ..Default::default()
        });
        votes::Entity::insert_many(rows).exec(&txn).await?;

        txn.commit().await?;
        Ok(submission.id)
    }
}

/// 当前活动轮次: active = true 中 id 最大的一条
pub async fn find_active_event<C>(db: &C) -> Result<Option<events::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    events::Entity::find()
        .filter(events::Column::Active.eq(true))
        .order_by_desc(events::Column::Id)
        .one(db)
        .await
}
