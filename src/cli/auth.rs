use serde_json::json;

use crate::api::auth::{self, SignInInput, SignUpInput};
use crate::cli::{anonymous_client, authed_client, report_error};
use crate::error::TaskFlowError;
use crate::output;
use crate::store::SessionStore;

pub async fn login(email: String, password: String, json_output: bool) -> i32 {
    let result = async {
        let client = anonymous_client()?;
        let token = auth::sign_in(&client, &SignInInput { email, password }).await?;
        let session = SessionStore::open_default()?;
        session.save_credentials(&token)?;
        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&output::json::success(json!({
                    "user": output::json::user_json(&token.user)
                })))
                .unwrap()
            );
        } else {
            println!("Signed in as {}", token.user.email);
        }
        Ok::<i32, TaskFlowError>(0)
    }
    .await;
    finish(result, json_output)
}

pub async fn signup(email: String, password: String, json_output: bool) -> i32 {
    let result = async {
        let client = anonymous_client()?;
        let user = auth::sign_up(&client, &SignUpInput { email, password }).await?;
        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&output::json::success(json!({
                    "user": output::json::user_json(&user)
                })))
                .unwrap()
            );
        } else {
            println!("Account created for {}. Run `taskflow login` to sign in.", user.email);
        }
        Ok::<i32, TaskFlowError>(0)
    }
    .await;
    finish(result, json_output)
}

pub fn logout(json_output: bool) -> i32 {
    let result = (|| {
        let session = SessionStore::open_default()?;
        session.clear_credentials()?;
        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&output::json::success(json!({}))).unwrap()
            );
        } else {
            println!("Signed out.");
        }
        Ok::<i32, TaskFlowError>(0)
    })();
    finish(result, json_output)
}

pub async fn whoami(json_output: bool) -> i32 {
    let result = async {
        let session = SessionStore::open_default()?;
        let client = authed_client(&session)?;
        let user = auth::me(&client).await?;
        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&output::json::success(json!({
                    "user": output::json::user_json(&user)
                })))
                .unwrap()
            );
        } else {
            output::text::print_user(&user);
        }
        Ok::<i32, TaskFlowError>(0)
    }
    .await;
    finish(result, json_output)
}

fn finish(result: Result<i32, TaskFlowError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, json_output);
            1
        }
    }
}
