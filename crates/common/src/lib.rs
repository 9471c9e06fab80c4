pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn api_message_serializes_msg_field() {
        let m = types::ApiMessage::new("Desde API");
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v, serde_json::json!({"msg": "Desde API"}));
    }
}
