// ==========================================
// Shopify 订单配送桥接系统 - 标签日期提取
// ==========================================
// 职责: 从逗号分隔的订单标签串中提取日期
// 输出口径: 统一为 DD/MM/YYYY;无法提取 → 空串
// ==========================================

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::types::DateTagKind;

// ===== 日期形态正则(按优先级排列) =====

fn re_plain_dmy() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("日期正则非法"))
}

fn re_iso_ymd() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("日期正则非法"))
}

fn re_dash_dmy() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{2})-(\d{2})-(\d{4})").expect("日期正则非法"))
}

fn re_loose_dmy() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})").expect("日期正则非法"))
}

/// 拆分标签串: 逗号分隔,逐个去除首尾空白,丢弃空段
pub fn split_tags(tags: &str) -> Vec<&str> {
    tags.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect()
}

/// 提取第一个 DD/MM/YYYY 形态的标签日期,原样返回
///
/// 契约: 仅认 "dd/mm/yyyy" 形态;其余形态不在此配方内转换
pub fn first_plain_date(tags: &str) -> String {
    for tag in split_tags(tags) {
        if let Some(m) = re_plain_dmy().find(tag) {
            return m.as_str().to_string();
        }
    }
    String::new()
}

/// 按关键词提取配送日/备货日标签中的日期,统一为 DD/MM/YYYY
///
/// 流程:
/// 1. 找到第一个(大小写不敏感)含关键词的标签
/// 2. 依次尝试 YYYY-MM-DD → DD/MM/YYYY → DD-MM-YYYY
/// 3. 都不命中时退回宽松形态 D/M/YYYY 并补零
/// 4. 全部失败 → 空串
pub fn tag_date(tags: &str, kind: DateTagKind) -> String {
    let keyword = kind.keyword();
    let tag = match split_tags(tags)
        .into_iter()
        .find(|t| t.to_lowercase().contains(keyword))
    {
        Some(t) => t,
        None => return String::new(),
    };

    // 形态1: YYYY-MM-DD → DD/MM/YYYY
    if let Some(caps) = re_iso_ymd().captures(tag) {
        return format!("{}/{}/{}", &caps[3], &caps[2], &caps[1]);
    }

    // 形态2: DD/MM/YYYY 原样
    if let Some(m) = re_plain_dmy().find(tag) {
        return m.as_str().to_string();
    }

    // 形态3: DD-MM-YYYY → DD/MM/YYYY
    if let Some(caps) = re_dash_dmy().captures(tag) {
        return format!("{}/{}/{}", &caps[1], &caps[2], &caps[3]);
    }

    // 宽松回退: D/M/YYYY 或 D-M-YYYY,补零输出
    if let Some(caps) = re_loose_dmy().captures(tag) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        return format!("{:02}/{:02}/{}", day, month, &caps[3]);
    }

    String::new()
}
