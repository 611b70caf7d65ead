use anyhow::Result;

use crate::auth::{self, StoredBasic, StoredConcept, StoredCredentials};
use crate::cli::LoginArgs;
use crate::output;

pub fn login(args: &LoginArgs, profile: &str) -> Result<()> {
    let concept = match (&args.api_key, &args.username, &args.password) {
        (Some(api_key), _, _) => StoredConcept::ApiKey {
            api_key: api_key.clone(),
        },
        (None, Some(username), Some(password)) => StoredConcept::Password {
            username: username.clone(),
            password: password.clone(),
        },
        _ => anyhow::bail!(
            "Concept service credentials required: --api-key, or --username with --password"
        ),
    };

    let creds = StoredCredentials {
        value_set: StoredBasic {
            username: args.vs_username.clone(),
            password: args.vs_password.clone(),
        },
        concept,
    };
    auth::save_credentials(profile, &creds)?;
    output::print_success(&format!("Credentials stored for profile '{profile}'"));
    Ok(())
}

pub fn logout(profile: &str) -> Result<()> {
    if auth::remove_credentials(profile)? {
        output::print_success(&format!("Credentials removed for profile '{profile}'"));
    } else {
        println!("No credentials stored for profile '{profile}'");
    }
    Ok(())
}

pub fn whoami(profile: &str) -> Result<()> {
    match auth::load_credentials(profile)? {
        Some(creds) => {
            println!("Profile: {profile}");
            println!("Value-set source user: {}", creds.value_set.username);
            match &creds.concept {
                StoredConcept::Password { username, .. } => {
                    println!("Concept service user: {username}");
                }
                StoredConcept::ApiKey { .. } => {
                    println!("Concept service auth: API key");
                }
            }
        }
        None => println!("Not logged in (profile '{profile}')"),
    }
    Ok(())
}
