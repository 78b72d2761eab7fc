//! Prints an admin access token for the moderation API.
//!
//! Usage: issue_admin_token --id <uuid> --name <name> --email <email> [--hours N]

use std::env;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

// Must stay in sync with the claims the server verifies.
#[derive(Debug, Serialize)]
struct AdminClaims {
    sub: String,
    name: String,
    email: String,
    role: &'static str,
    exp: i64,
    iat: i64,
    typ: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<String>,
}

#[derive(Debug, Default)]
struct Args {
    id: Option<Uuid>,
    name: Option<String>,
    email: Option<String>,
    hours: Option<i64>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    while let Some(flag) = raw.next() {
        let value = raw
            .next()
            .ok_or_else(|| format!("{flag} expects a value"))?;
        match flag.as_str() {
            "--id" => {
                args.id = Some(Uuid::parse_str(&value).map_err(|_| "--id must be a UUID")?);
            }
            "--name" => args.name = Some(value),
            "--email" => args.email = Some(value),
            "--hours" => {
                let hours = value
                    .parse::<i64>()
                    .ok()
                    .filter(|hours| *hours > 0)
                    .ok_or("--hours must be a positive integer")?;
                args.hours = Some(hours);
            }
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args = parse_args(env::args().skip(1))?;
    let id = args.id.ok_or("--id is required")?;
    let name = args.name.ok_or("--name is required")?;
    let email = args.email.ok_or("--email is required")?;
    let secret = non_empty_env("JWT_SECRET").ok_or("JWT_SECRET must be set")?;
    let hours = args
        .hours
        .or_else(|| non_empty_env("JWT_EXPIRATION_HOURS").and_then(|value| value.parse().ok()))
        .unwrap_or(24);

    let now = Utc::now();
    let claims = AdminClaims {
        sub: id.to_string(),
        name,
        email,
        role: "admin",
        exp: (now + Duration::hours(hours)).timestamp(),
        iat: now.timestamp(),
        typ: "access",
        iss: non_empty_env("JWT_ISSUER"),
        aud: non_empty_env("JWT_AUDIENCE"),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    println!("{token}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Result<Args, String> {
        parse_args(raw.iter().map(|value| value.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let id = Uuid::new_v4();
        let parsed = args(&[
            "--id",
            &id.to_string(),
            "--name",
            "Site Admin",
            "--email",
            "admin@example.com",
            "--hours",
            "2",
        ])
        .unwrap();

        assert_eq!(parsed.id, Some(id));
        assert_eq!(parsed.name.as_deref(), Some("Site Admin"));
        assert_eq!(parsed.hours, Some(2));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(args(&["--id", "nope"]).is_err());
        assert!(args(&["--hours", "0"]).is_err());
        assert!(args(&["--name"]).is_err());
        assert!(args(&["--verbose", "1"]).is_err());
    }
}
