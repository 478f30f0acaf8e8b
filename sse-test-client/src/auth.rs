use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Basic auth credentials for the hub's protected endpoints.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn parse(input: &str) -> Result<Self> {
        let Some((username, password)) = input.split_once(':') else {
            anyhow::bail!("Invalid credentials format. Expected username:password");
        };
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}
