pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["status"], "ok");
    }

    #[test]
    fn flash_message_serializes_payload_inline() {
        let f = types::Flash::new("saved", serde_json::json!({"id": 7}));
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["message"], "saved");
        assert_eq!(v["data"]["id"], 7);
    }
}
