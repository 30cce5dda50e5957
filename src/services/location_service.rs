use crate::entities::location_entity as locations;
use crate::error::AppResult;
use crate::models::LocationResponse;
use crate::services::find_active_event;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

#[derive(Clone)]
pub struct LocationService {
    pool: DatabaseConnection,
    require_active_event: bool,
}

impl LocationService {
    pub fn new(pool: DatabaseConnection, require_active_event: bool) -> Self {
        Self {
            pool,
            require_active_event,
        }
    }

    /// 获取可投票地点（按 id 升序）
    /// 启用轮次限定时只返回当前活动轮次的地点，无活动轮次返回空列表
    pub async fn list_locations(&self) -> AppResult<Vec<LocationResponse>> {
        let mut query = locations::Entity::find().order_by_asc(locations::Column::Id);

        if self.require_active_event {
            let Some(event) = find_active_event(&self.pool).await? else {
                return Ok(Vec::new());
            };
            query = query.filter(locations::Column::EventId.eq(event.id));
        }

        let list = query.all(&self.pool).await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}
