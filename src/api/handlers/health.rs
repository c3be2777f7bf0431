/// Liveness check. Never calls the Nest API.
pub async fn health() -> &'static str {
    "OK"
}
