// ==========================================
// Shopify 订单配送桥接系统 - 字段映射规则模型
// ==========================================
// 职责: 描述两类映射规则(全局字段映射 / 提取处理映射)
// 红线: 规则是纯数据,由仓储层持久化,转换引擎只读
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ExtractRecipe - 提取配方
// ==========================================
// 说明: 配方选择必须显式(枚举),不允许由 source_field 字符串推断
// 序列化格式: camelCase (与映射配置 JSON 一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractRecipe {
    Date,        // 标签中的日期
    Time,        // 标签中的时间/时段
    Group,       // 订单号前缀分组
    ItemCount,   // 行项目数量聚合
    Description, // 行项目描述拼接
    Phone,       // 电话字段(可归一化)
    Skip,        // 无条件空值
}

impl std::fmt::Display for ExtractRecipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractRecipe::Date => write!(f, "date"),
            ExtractRecipe::Time => write!(f, "time"),
            ExtractRecipe::Group => write!(f, "group"),
            ExtractRecipe::ItemCount => write!(f, "itemCount"),
            ExtractRecipe::Description => write!(f, "description"),
            ExtractRecipe::Phone => write!(f, "phone"),
            ExtractRecipe::Skip => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for ExtractRecipe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(ExtractRecipe::Date),
            "time" => Ok(ExtractRecipe::Time),
            "group" => Ok(ExtractRecipe::Group),
            "itemCount" => Ok(ExtractRecipe::ItemCount),
            "description" => Ok(ExtractRecipe::Description),
            "phone" => Ok(ExtractRecipe::Phone),
            "skip" => Ok(ExtractRecipe::Skip),
            other => Err(format!("未知提取配方: {}", other)),
        }
    }
}

// ==========================================
// GlobalFieldMapping - 全局字段映射
// ==========================================
// 契约: destination_field 在规则集内唯一;
//       no_mapping=true 时目标字段恒为空串
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalFieldMapping {
    pub destination_field: String,

    /// 按序取值的源字段路径(点号路径; "line_items." 前缀只取第一个行项目)
    #[serde(default)]
    pub source_field_paths: Vec<String>,

    /// 多路径取值的拼接分隔符,缺省为单个空格
    #[serde(default = "default_join_separator")]
    pub join_separator: String,

    #[serde(default)]
    pub no_mapping: bool,
}

fn default_join_separator() -> String {
    " ".to_string()
}

impl GlobalFieldMapping {
    pub fn new(destination_field: &str, source_field_paths: &[&str]) -> Self {
        Self {
            destination_field: destination_field.to_string(),
            source_field_paths: source_field_paths.iter().map(|s| s.to_string()).collect(),
            join_separator: default_join_separator(),
            no_mapping: false,
        }
    }

    /// 构造一条"不映射"规则(目标恒为空)
    pub fn unmapped(destination_field: &str) -> Self {
        Self {
            destination_field: destination_field.to_string(),
            source_field_paths: Vec::new(),
            join_separator: default_join_separator(),
            no_mapping: true,
        }
    }

    pub fn with_separator(mut self, sep: &str) -> Self {
        self.join_separator = sep.to_string();
        self
    }
}

// ==========================================
// ExtractProcessingMapping - 提取处理映射
// ==========================================
// 契约: destination_field 在规则集内唯一;
//       format 选择配方内的具体变体(如 sum_quantities / normalize)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractProcessingMapping {
    pub destination_field: String,

    pub recipe: ExtractRecipe,

    /// 源字段标识: "order.tags" / "order.name" / "line_items" / 点号路径
    pub source_field: String,

    /// 配方参数(可选),如 "dd/mm/yyyy" / "time_window" / "normalize"
    #[serde(default)]
    pub format: Option<String>,
}

impl ExtractProcessingMapping {
    pub fn new(
        destination_field: &str,
        recipe: ExtractRecipe,
        source_field: &str,
        format: Option<&str>,
    ) -> Self {
        Self {
            destination_field: destination_field.to_string(),
            recipe,
            source_field: source_field.to_string(),
            format: format.map(|s| s.to_string()),
        }
    }
}
