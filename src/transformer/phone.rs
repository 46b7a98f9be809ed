// ==========================================
// Shopify 订单配送桥接系统 - 电话号码归一化
// ==========================================
// 职责: 把带格式的电话号码清洗为派单可用的本地形态
// 红线: 先剥离格式字符,再判断前缀——顺序不可颠倒
// ==========================================

/// 归一化电话号码
///
/// 步骤:
/// 1. 去除空白、连字符、括号、点号
/// 2. "+65" 开头 → 去掉 "+65"(本地号码)
/// 3. 其余 "+" 开头 → 仅去掉 "+"
/// 4. 无前缀 → 原样返回(视为已是本地干净格式)
pub fn normalize_phone(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')' | '.'))
        .collect();

    if let Some(rest) = stripped.strip_prefix("+65") {
        return rest.to_string();
    }
    if let Some(rest) = stripped.strip_prefix('+') {
        return rest.to_string();
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_sg_number_drops_country_code() {
        assert_eq!(normalize_phone("+65 9876 5432"), "98765432");
        assert_eq!(normalize_phone("+65-9876-5432"), "98765432");
    }

    #[test]
    fn test_foreign_number_drops_plus_only() {
        // 先剥格式字符,再只去掉 "+"
        assert_eq!(normalize_phone("+1 555-123-4567"), "15551234567");
    }

    #[test]
    fn test_strip_order_matters() {
        // "+ 65 ..." 剥空白后才构成 "+65" 前缀
        assert_eq!(normalize_phone("+ 65 1234 5678"), "12345678");
    }

    #[test]
    fn test_already_clean_passthrough() {
        assert_eq!(normalize_phone("98765432"), "98765432");
        assert_eq!(normalize_phone("(65) 9876.5432"), "6598765432");
        assert_eq!(normalize_phone(""), "");
    }
}
