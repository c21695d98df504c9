use serde_json::Value;

/// 事件層級要移除的衍生欄位
const EVENT_DERIVED_FIELDS: [&str; 3] = ["ltv", "ltv_net", "cogs"];
/// 商品層級要移除的衍生欄位
const PRODUCT_DERIVED_FIELDS: [&str; 2] = ["ltv", "cogs"];

/// 產生移除 properties 與 products 衍生欄位後的新事件，原事件不變
pub fn sanitize(event: &Value) -> Value {
    let mut cleaned = event.clone();

    if let Some(props) = cleaned.get_mut("properties").and_then(Value::as_object_mut) {
        for field in EVENT_DERIVED_FIELDS {
            props.remove(field);
        }

        if let Some(products) = props.get_mut("products").and_then(Value::as_array_mut) {
            for product in products.iter_mut() {
                if let Some(entry) = product.as_object_mut() {
                    for field in PRODUCT_DERIVED_FIELDS {
                        entry.remove(field);
                    }
                }
            }
        }
    }

    cleaned
}
