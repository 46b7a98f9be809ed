// ==========================================
// Shopify 订单配送桥接系统 - 时段提取与分桶
// ==========================================
// 职责: 从标签中提取 HH:MM / HH:MM-HH:MM,
//       并将时段折算为放单时刻或命名时窗
// 红线: 分桶按"起始分钟数"的左闭右开区间判定;
//       区间外的时段原样返回,不报错
// ==========================================

use regex::Regex;
use std::sync::OnceLock;

// ===== 分桶边界(分钟数,自午夜起) =====
// [600,840)  = 10:00-14:00 → 上午桶
// [840,1080) = 14:00-18:00 → 下午桶
// [1080,1320)= 18:00-22:00 → 夜间桶
const MORNING_BUCKET: (i32, i32) = (600, 840);
const AFTERNOON_BUCKET: (i32, i32) = (840, 1080);
const NIGHT_BUCKET: (i32, i32) = (1080, 1320);

fn re_time_range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}:\d{2}\s*-\s*\d{1,2}:\d{2}").expect("时段正则非法"))
}

fn re_single_time() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}:\d{2}").expect("时刻正则非法"))
}

/// 提取第一个 HH:MM-HH:MM 时段,返回正则命中的原始子串
pub fn find_time_range(text: &str) -> Option<String> {
    re_time_range().find(text).map(|m| m.as_str().to_string())
}

/// 提取第一个 HH:MM 时刻,返回正则命中的原始子串
pub fn find_single_time(text: &str) -> Option<String> {
    re_single_time().find(text).map(|m| m.as_str().to_string())
}

/// 时段字面量提取: 先找时段,缺失时退回单个时刻,均无 → 空串
///
/// 契约: 返回命中的字面子串,不做补零以外的任何改写
pub fn time_window_literal(tags: &str) -> String {
    find_time_range(tags)
        .or_else(|| find_single_time(tags))
        .unwrap_or_default()
}

/// 将 "H:MM" 补零为 "HH:MM";非时刻形态原样返回
pub fn pad_time(raw: &str) -> String {
    match raw.split_once(':') {
        Some((h, m)) => match h.trim().parse::<u32>() {
            Ok(hour) => format!("{:02}:{}", hour, m.trim()),
            Err(_) => raw.to_string(),
        },
        None => raw.to_string(),
    }
}

/// 解析时段起点的分钟数(自午夜起)
fn range_start_minutes(range: &str) -> Option<i32> {
    let start = range.split('-').next()?.trim();
    let (h, m) = start.split_once(':')?;
    let hour: i32 = h.trim().parse().ok()?;
    let minute: i32 = m.trim().parse().ok()?;
    Some(hour * 60 + minute)
}

/// 时段 → 放单时刻
///
/// [600,840) → "08:45"; [840,1080) → "13:45"; [1080,1320) → "17:15";
/// 区间外或无法解析 → 原样返回
pub fn bucket_release_time(range: &str) -> String {
    match range_start_minutes(range) {
        Some(min) if min >= MORNING_BUCKET.0 && min < MORNING_BUCKET.1 => "08:45".to_string(),
        Some(min) if min >= AFTERNOON_BUCKET.0 && min < AFTERNOON_BUCKET.1 => "13:45".to_string(),
        Some(min) if min >= NIGHT_BUCKET.0 && min < NIGHT_BUCKET.1 => "17:15".to_string(),
        _ => range.to_string(),
    }
}

/// 时段 → 命名时窗
///
/// 边界与放单时刻分桶完全一致,仅输出不同
pub fn bucket_named_window(range: &str) -> String {
    match range_start_minutes(range) {
        Some(min) if min >= MORNING_BUCKET.0 && min < MORNING_BUCKET.1 => "Morning".to_string(),
        Some(min) if min >= AFTERNOON_BUCKET.0 && min < AFTERNOON_BUCKET.1 => {
            "Afternoon".to_string()
        }
        Some(min) if min >= NIGHT_BUCKET.0 && min < NIGHT_BUCKET.1 => "Night".to_string(),
        _ => range.to_string(),
    }
}

/// 放单时刻提取
///
/// 1. 标签含 morning/afternoon/night(大小写不敏感) → 固定时刻
/// 2. 否则找 HH:MM-HH:MM 时段 → 分桶
/// 3. 否则找单个 HH:MM → 补零
/// 4. 均无 → 空串
pub fn job_release_time(tags: &str) -> String {
    let lower = tags.to_lowercase();
    if lower.contains("morning") {
        return "09:00".to_string();
    }
    if lower.contains("afternoon") {
        return "14:00".to_string();
    }
    if lower.contains("night") {
        return "18:00".to_string();
    }

    if let Some(range) = find_time_range(tags) {
        return bucket_release_time(&range);
    }

    if let Some(single) = find_single_time(tags) {
        return pad_time(&single);
    }

    String::new()
}

/// 送达完成时窗提取
///
/// 1. 关键词 → 固定时段 09:00-12:00 / 14:00-18:00 / 18:00-21:00
/// 2. 否则显式时段 → 命名时窗分桶
/// 3. 均无 → 空串
pub fn completion_time_window(tags: &str) -> String {
    let lower = tags.to_lowercase();
    if lower.contains("morning") {
        return "09:00-12:00".to_string();
    }
    if lower.contains("afternoon") {
        return "14:00-18:00".to_string();
    }
    if lower.contains("night") {
        return "18:00-21:00".to_string();
    }

    if let Some(range) = find_time_range(tags) {
        return bucket_named_window(&range);
    }

    String::new()
}
