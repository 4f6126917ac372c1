//! `switchboard call`: JSON-RPC call or notification against a running
//! server.

use crate::client::RpcClient;

use super::{parse_params, print_json};

pub async fn run(url: &str, method: &str, params_str: &str, notify: bool) -> Result<(), String> {
    let params = parse_params(params_str)?;
    let client = RpcClient::new(url);

    if notify {
        client.notify(method, params).await.map_err(|e| e.to_string())?;
        println!("Notification sent");
        return Ok(());
    }

    let result = client.call(method, params).await.map_err(|e| e.to_string())?;
    print_json(&result);
    Ok(())
}
