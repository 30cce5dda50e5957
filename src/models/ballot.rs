//! 客户端投票过程中的选择状态。
//!
//! `BallotState` 是不可变值对象，所有变化都通过 `reduce(state, action)` 产生新状态，
//! 与界面渲染无关。两条转换规则:
//! - 只选中一个地点时，它自动获得 3 分
//! - 给某地点分配已被其他地点占用的分值时，两者交换分值

use serde::{Deserialize, Serialize};

use super::{SelectionInput, SubmitVoteRequest};
use crate::error::{AppError, AppResult};
use crate::services::validate_selections;

/// 一次投票最多可选地点数
pub const MAX_SELECTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotChoice {
    pub location_id: i32,
    pub points: Option<i32>,
    pub comment: String,
}

impl BallotChoice {
    fn new(location_id: i32) -> Self {
        Self {
            location_id,
            points: None,
            comment: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BallotAction {
    /// 选中/取消选中地点 (已满 3 个时忽略新增)
    Toggle(i32),
    AssignPoints { location_id: i32, points: i32 },
    SetComment { location_id: i32, comment: String },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BallotState {
    /// 按选中顺序排列
    choices: Vec<BallotChoice>,
}

impl BallotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choices(&self) -> &[BallotChoice] {
        &self.choices
    }

    pub fn is_full(&self) -> bool {
        self.choices.len() >= MAX_SELECTIONS
    }

    pub fn points_of(&self, location_id: i32) -> Option<i32> {
        self.find(location_id).and_then(|c| c.points)
    }

    fn find(&self, location_id: i32) -> Option<&BallotChoice> {
        self.choices.iter().find(|c| c.location_id == location_id)
    }

    pub fn reduce(self, action: BallotAction) -> Self {
        let next = match action {
            BallotAction::Toggle(location_id) => self.toggle(location_id),
            BallotAction::AssignPoints {
                location_id,
                points,
            } => self.assign_points(location_id, points),
            BallotAction::SetComment {
                location_id,
                comment,
            } => self.set_comment(location_id, comment),
            BallotAction::Reset => Self::default(),
        };
        next.auto_assign_single()
    }

    fn toggle(mut self, location_id: i32) -> Self {
        if self.find(location_id).is_some() {
            self.choices.retain(|c| c.location_id != location_id);
        } else if !self.is_full() {
            self.choices.push(BallotChoice::new(location_id));
        }
        self
    }

    fn assign_points(mut self, location_id: i32, points: i32) -> Self {
        if !(1..=3).contains(&points) {
            return self;
        }
        let Some(target) = self
            .choices
            .iter()
            .position(|c| c.location_id == location_id)
        else {
            return self;
        };

        let previous = self.choices[target].points;
        if let Some(holder) = self
            .choices
            .iter()
            .position(|c| c.location_id != location_id && c.points == Some(points))
        {
            self.choices[holder].points = previous;
        }
        self.choices[target].points = Some(points);
        self
    }

    fn set_comment(mut self, location_id: i32, comment: String) -> Self {
        if let Some(choice) = self
            .choices
            .iter_mut()
            .find(|c| c.location_id == location_id)
        {
            choice.comment = comment;
        }
        self
    }

    fn auto_assign_single(mut self) -> Self {
        if let [only] = self.choices.as_mut_slice() {
            only.points = Some(3);
        }
        self
    }

    /// 生成提交请求，并在本地做与服务端一致的校验
    pub fn to_request(&self) -> AppResult<SubmitVoteRequest> {
        let mut selections = Vec::with_capacity(self.choices.len());
        for choice in &self.choices {
            let points = choice
                .points
                .ok_or(AppError::InvalidPointAssignment(expected_points_label(
                    self.choices.len(),
                )))?;
            selections.push(SelectionInput {
                location_id: choice.location_id,
                points,
                comment: Some(choice.comment.clone()).filter(|c| !c.trim().is_empty()),
            });
        }
        validate_selections(&selections)?;
        Ok(SubmitVoteRequest { selections })
    }
}

fn expected_points_label(count: usize) -> &'static str {
    crate::services::canonical_points(count)
        .map(|(_, label)| label)
        .unwrap_or("1, 2 or 3")
}
