use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub const OK: Self = Self { status: "ok" };
    pub const UNAVAILABLE: Self = Self {
        status: "unavailable",
    };
}
