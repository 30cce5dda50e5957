use uuid::Uuid;

/// 生成 submission 的不透明随机标识 (32 位十六进制)
pub fn generate_submission_token() -> String {
    Uuid::new_v4().simple().to_string()
}
