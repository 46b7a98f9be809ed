// ==========================================
// Shopify 订单配送桥接系统 - 映射配置 API
// ==========================================
// 职责: 看板上的映射规则维护入口
// 红线: destination_field 跨两套规则重复时行为未定义——
//       这里显式拦截并报给操作员,不做任何隐式取舍
// ==========================================

use std::sync::{Arc, Mutex};
use tracing::info;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::defaults::{default_extract_mappings, default_global_mappings};
use crate::domain::mapping::{ExtractProcessingMapping, GlobalFieldMapping};
use crate::repository::MappingRepository;

/// 两套映射规则的整体视图
#[derive(Debug, Clone)]
pub struct MappingSets {
    pub global: Vec<GlobalFieldMapping>,
    pub extract: Vec<ExtractProcessingMapping>,
}

// ==========================================
// MappingApi - 映射配置 API
// ==========================================
pub struct MappingApi {
    repo: MappingRepository,
}

impl MappingApi {
    pub fn new(conn: Arc<Mutex<rusqlite::Connection>>) -> Self {
        Self {
            repo: MappingRepository::new(conn),
        }
    }

    /// 查询两套规则
    pub fn list_mappings(&self) -> ApiResult<MappingSets> {
        Ok(MappingSets {
            global: self.repo.list_global()?,
            extract: self.repo.list_extract()?,
        })
    }

    /// 校验两套规则(不落库)
    ///
    /// 规则:
    /// - destination_field 不得为空
    /// - 非 no_mapping 的全局映射必须至少有一条非空源路径
    /// - 提取映射的 source_field 不得为空
    /// - destination_field 跨两套规则不得重复
    pub fn validate(
        global: &[GlobalFieldMapping],
        extract: &[ExtractProcessingMapping],
    ) -> Vec<ValidationViolation> {
        let mut violations = Vec::new();

        for m in global {
            if m.destination_field.trim().is_empty() {
                violations.push(ValidationViolation {
                    field: "(global)".to_string(),
                    message: "目标字段不能为空".to_string(),
                });
            }
            if !m.no_mapping
                && !m.source_field_paths.iter().any(|p| !p.trim().is_empty())
            {
                violations.push(ValidationViolation {
                    field: m.destination_field.clone(),
                    message: "至少需要一条非空源路径(或改为 no_mapping)".to_string(),
                });
            }
        }

        for m in extract {
            if m.destination_field.trim().is_empty() {
                violations.push(ValidationViolation {
                    field: "(extract)".to_string(),
                    message: "目标字段不能为空".to_string(),
                });
            }
            if m.source_field.trim().is_empty() {
                violations.push(ValidationViolation {
                    field: m.destination_field.clone(),
                    message: "源字段不能为空".to_string(),
                });
            }
        }

        // 跨集重复: 提取与全局同时指向同一目标字段
        for g in global {
            if extract
                .iter()
                .any(|e| e.destination_field == g.destination_field)
            {
                violations.push(ValidationViolation {
                    field: g.destination_field.clone(),
                    message: "该目标字段同时出现在提取映射与全局映射中,请保留其一".to_string(),
                });
            }
        }

        violations
    }

    /// 整体保存两套规则(先校验,有违规则整体拒绝)
    pub fn save_all(
        &self,
        global: Vec<GlobalFieldMapping>,
        extract: Vec<ExtractProcessingMapping>,
    ) -> ApiResult<()> {
        let violations = Self::validate(&global, &extract);
        if !violations.is_empty() {
            return Err(ApiError::ValidationFailed { violations });
        }
        self.repo.replace_all(&global, &extract)?;
        info!(
            global = global.len(),
            extract = extract.len(),
            "映射规则已整体保存"
        );
        Ok(())
    }

    /// 写入/覆盖单条全局映射
    pub fn upsert_global(&self, mapping: GlobalFieldMapping) -> ApiResult<()> {
        if mapping.destination_field.trim().is_empty() {
            return Err(ApiError::InvalidInput("目标字段不能为空".to_string()));
        }
        self.repo.upsert_global(&mapping)?;
        Ok(())
    }

    /// 写入/覆盖单条提取映射
    pub fn upsert_extract(&self, mapping: ExtractProcessingMapping) -> ApiResult<()> {
        if mapping.destination_field.trim().is_empty() {
            return Err(ApiError::InvalidInput("目标字段不能为空".to_string()));
        }
        self.repo.upsert_extract(&mapping)?;
        Ok(())
    }

    pub fn delete_global(&self, destination_field: &str) -> ApiResult<()> {
        self.repo.delete_global(destination_field)?;
        Ok(())
    }

    pub fn delete_extract(&self, destination_field: &str) -> ApiResult<()> {
        self.repo.delete_extract(destination_field)?;
        Ok(())
    }

    /// 两套规则为空时播种出厂默认(建库后首次启动)
    pub fn seed_defaults_if_empty(&self) -> ApiResult<bool> {
        if !self.repo.is_empty()? {
            return Ok(false);
        }
        self.repo
            .replace_all(&default_global_mappings(), &default_extract_mappings())?;
        info!("已播种默认映射规则");
        Ok(true)
    }
}
