#![forbid(unsafe_code)]

fn main() {
    let json_errors = std::env::var("SCALELAB_ERROR_FORMAT").is_ok_and(|v| v == "json");
    if let Err(error) = scalelab_cli::run_from_env() {
        if json_errors {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("scalelab: {error}");
        }
        std::process::exit(error.exit_code());
    }
}
