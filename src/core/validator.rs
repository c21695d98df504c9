use crate::domain::model::Verdict;
use serde_json::{Map, Value};

pub const PASS_REASON: &str = "All validations passed";

/// enrichment 欄位檢查順序固定，缺漏訊息依此排序
const REQUIRED_FIELDS: [&str; 3] = ["ltv", "cogs", "ltv_net"];

/// 依序檢查 enrichment 回應，第一個失敗的檢查即為結果
pub fn validate(response: &Value) -> (Verdict, String) {
    // 空回應（JSON null 或空物件）一律視為沒有結果
    if response.is_null() || response.as_object().is_some_and(Map::is_empty) {
        return (Verdict::Fail, "No response".to_string());
    }

    if let Some(error) = response.get("error") {
        return (Verdict::Fail, render_error(error));
    }

    let empty = Map::new();
    let props = response
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !props.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return (
            Verdict::Fail,
            format!("Missing fields: {}", missing.join(", ")),
        );
    }

    for field in REQUIRED_FIELDS {
        let Some(value) = props.get(field) else {
            continue;
        };
        if let Err(reason) = to_f64(field, value) {
            return (Verdict::Fail, format!("Invalid numeric values: {}", reason));
        }
    }

    let no_products = Vec::new();
    let products = props
        .get("products")
        .and_then(Value::as_array)
        .unwrap_or(&no_products);
    for (idx, product) in products.iter().enumerate() {
        let entry = product.as_object();
        if !entry.is_some_and(|p| p.contains_key("ltv")) {
            return (Verdict::Fail, format!("Product {} missing ltv", idx));
        }
        if !entry.is_some_and(|p| p.contains_key("cogs")) {
            return (Verdict::Fail, format!("Product {} missing cogs", idx));
        }
    }

    (Verdict::Pass, PASS_REASON.to_string())
}

/// error 欄位通常是字串，其他型別退回緊湊 JSON 呈現
fn render_error(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

fn to_f64(field: &str, value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| format!("{} is not representable as a float", field)),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("could not convert '{}' to float for {}: {}", text, field, e)),
        other => Err(format!("{} has non-numeric value: {}", field, other)),
    }
}
