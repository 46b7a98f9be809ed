// ==========================================
// Shopify 订单配送桥接系统 - 映射规则仓储
// ==========================================
// 职责: 两套映射规则的持久化访问
// 红线: Repository 不含业务逻辑;destination_field 的
//       集内唯一性由主键保证,跨集重复由 API 层校验
// ==========================================

use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::domain::mapping::{ExtractProcessingMapping, ExtractRecipe, GlobalFieldMapping};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// MappingRepository - 映射规则仓储
// ==========================================
pub struct MappingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MappingRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 全局字段映射
    // ==========================================

    /// 写入/覆盖一条全局映射
    pub fn upsert_global(&self, mapping: &GlobalFieldMapping) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let paths_json = serde_json::to_string(&mapping.source_field_paths)?;

        conn.execute(
            r#"INSERT INTO global_field_mapping
                   (destination_field, source_field_paths, join_separator, no_mapping, updated_at)
               VALUES (?1, ?2, ?3, ?4, datetime('now'))
               ON CONFLICT(destination_field) DO UPDATE SET
                   source_field_paths = excluded.source_field_paths,
                   join_separator = excluded.join_separator,
                   no_mapping = excluded.no_mapping,
                   updated_at = excluded.updated_at"#,
            params![
                &mapping.destination_field,
                &paths_json,
                &mapping.join_separator,
                mapping.no_mapping as i64,
            ],
        )?;
        Ok(())
    }

    /// 查询全部全局映射,按目标字段排序
    pub fn list_global(&self) -> RepositoryResult<Vec<GlobalFieldMapping>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT destination_field, source_field_paths, join_separator, no_mapping
               FROM global_field_mapping
               ORDER BY destination_field"#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut mappings = Vec::new();
        for row in rows {
            let (destination_field, paths_json, join_separator, no_mapping) = row?;
            let source_field_paths: Vec<String> =
                serde_json::from_str(&paths_json).map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: format!("{}.source_field_paths", destination_field),
                        message: e.to_string(),
                    }
                })?;
            mappings.push(GlobalFieldMapping {
                destination_field,
                source_field_paths,
                join_separator,
                no_mapping: no_mapping != 0,
            });
        }
        Ok(mappings)
    }

    /// 删除一条全局映射
    pub fn delete_global(&self, destination_field: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM global_field_mapping WHERE destination_field = ?1",
            params![destination_field],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "global_field_mapping".to_string(),
                id: destination_field.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 提取处理映射
    // ==========================================

    /// 写入/覆盖一条提取映射
    pub fn upsert_extract(&self, mapping: &ExtractProcessingMapping) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO extract_processing_mapping
                   (destination_field, recipe, source_field, format, updated_at)
               VALUES (?1, ?2, ?3, ?4, datetime('now'))
               ON CONFLICT(destination_field) DO UPDATE SET
                   recipe = excluded.recipe,
                   source_field = excluded.source_field,
                   format = excluded.format,
                   updated_at = excluded.updated_at"#,
            params![
                &mapping.destination_field,
                mapping.recipe.to_string(),
                &mapping.source_field,
                &mapping.format,
            ],
        )?;
        Ok(())
    }

    /// 查询全部提取映射,按目标字段排序
    pub fn list_extract(&self) -> RepositoryResult<Vec<ExtractProcessingMapping>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT destination_field, recipe, source_field, format
               FROM extract_processing_mapping
               ORDER BY destination_field"#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut mappings = Vec::new();
        for row in rows {
            let (destination_field, recipe_text, source_field, format) = row?;
            let recipe: ExtractRecipe = recipe_text.parse().map_err(|message| {
                RepositoryError::FieldValueError {
                    field: format!("{}.recipe", destination_field),
                    message,
                }
            })?;
            mappings.push(ExtractProcessingMapping {
                destination_field,
                recipe,
                source_field,
                format,
            });
        }
        Ok(mappings)
    }

    /// 删除一条提取映射
    pub fn delete_extract(&self, destination_field: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM extract_processing_mapping WHERE destination_field = ?1",
            params![destination_field],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "extract_processing_mapping".to_string(),
                id: destination_field.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 批量替换(播种/整体保存用)
    // ==========================================

    /// 以事务整体替换两套规则
    pub fn replace_all(
        &self,
        global: &[GlobalFieldMapping],
        extract: &[ExtractProcessingMapping],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;

        tx.execute("DELETE FROM global_field_mapping", [])?;
        tx.execute("DELETE FROM extract_processing_mapping", [])?;

        for mapping in global {
            let paths_json = serde_json::to_string(&mapping.source_field_paths)?;
            tx.execute(
                r#"INSERT INTO global_field_mapping
                       (destination_field, source_field_paths, join_separator, no_mapping, updated_at)
                   VALUES (?1, ?2, ?3, ?4, datetime('now'))"#,
                params![
                    &mapping.destination_field,
                    &paths_json,
                    &mapping.join_separator,
                    mapping.no_mapping as i64,
                ],
            )?;
        }
        for mapping in extract {
            tx.execute(
                r#"INSERT INTO extract_processing_mapping
                       (destination_field, recipe, source_field, format, updated_at)
                   VALUES (?1, ?2, ?3, ?4, datetime('now'))"#,
                params![
                    &mapping.destination_field,
                    mapping.recipe.to_string(),
                    &mapping.source_field,
                    &mapping.format,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
        Ok(())
    }

    /// 两套规则是否均为空(决定是否播种默认规则)
    pub fn is_empty(&self) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            r#"SELECT (SELECT COUNT(*) FROM global_field_mapping)
                    + (SELECT COUNT(*) FROM extract_processing_mapping)"#,
            [],
            |row| row.get(0),
        )?;
        Ok(count == 0)
    }
}
