//! 作业存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignment_files::{
    ActiveModel as AssignmentFileActiveModel, Column as AssignmentFileColumn,
    Entity as AssignmentFiles,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{PortalError, Result};
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    files::entities::FileRef,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业（作业行与附件行同一事务写入）
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Assignment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            deadline: Set(req.deadline.timestamp()),
            created_by: Set(created_by),
            created_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建作业失败: {e}")))?;

        // 附件按上传顺序落库
        for (position, file) in req.files.iter().enumerate() {
            let file_model = AssignmentFileActiveModel {
                assignment_id: Set(result.id),
                file_name: Set(file.file_name.clone()),
                blob_handle: Set(file.blob_handle.clone()),
                file_size: Set(file.file_size),
                position: Set(position as i32),
                ..Default::default()
            };

            file_model
                .insert(&txn)
                .await
                .map_err(|e| PortalError::database_operation(format!("创建作业附件失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_assignment(req.files))
    }

    /// 通过 ID 获取作业（含附件）
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询作业失败: {e}")))?;

        let Some(model) = result else {
            return Ok(None);
        };

        let files = self.get_assignment_files_impl(assignment_id).await?;

        Ok(Some(model.into_assignment(files)))
    }

    /// 列出作业（按创建时间倒序）
    pub async fn list_assignments_impl(&self) -> Result<Vec<Assignment>> {
        let models = Assignments::find()
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询作业列表失败: {e}")))?;

        if models.is_empty() {
            return Ok(vec![]);
        }

        // 批量查询附件并按作业聚合
        let assignment_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let file_models = AssignmentFiles::find()
            .filter(AssignmentFileColumn::AssignmentId.is_in(assignment_ids))
            .order_by_asc(AssignmentFileColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询作业附件失败: {e}")))?;

        let mut files_map: HashMap<i64, Vec<FileRef>> = HashMap::new();
        for file in file_models {
            let assignment_id = file.assignment_id;
            files_map
                .entry(assignment_id)
                .or_default()
                .push(file.into_file_ref());
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let files = files_map.remove(&m.id).unwrap_or_default();
                m.into_assignment(files)
            })
            .collect())
    }

    /// 获取作业附件列表（按上传顺序）
    pub async fn get_assignment_files_impl(&self, assignment_id: i64) -> Result<Vec<FileRef>> {
        let results = AssignmentFiles::find()
            .filter(AssignmentFileColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(AssignmentFileColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询作业附件失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_file_ref()).collect())
    }
}
