use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_OUTPUT_DIR: &str = "static/generated";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_PIECES: u32 = 20;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Root for generated packs, served under `/static/generated`.
    pub output_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub server_url: String,
    pub pieces: u32,
}
