use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::json;

use url_router::config::schema::parse_method;
use url_router::config::{load_config, ConfigError};
use url_router::routing::route::method_label;
use url_router::routing::AllowedMethods;
use url_router::{Router, Target};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and test url-router route tables offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a route table
    Check { config: PathBuf },
    /// List routes in declaration order, synthesized ones included
    Routes { config: PathBuf },
    /// Resolve a URL or path against a route table
    Resolve {
        config: PathBuf,
        url: String,
        /// Request method; omitted means every route is eligible
        #[arg(short, long)]
        method: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => match load_config(&config) {
            Ok(config) => {
                config.build_router()?;
                println!("OK: {} routes", config.routes.len());
            }
            Err(ConfigError::Validation(errors)) => {
                for err in &errors {
                    eprintln!("error: {}", err);
                }
                return Err(format!("{} validation error(s)", errors.len()).into());
            }
            Err(e) => return Err(e.into()),
        },
        Commands::Routes { config } => {
            let router = build(&config)?;
            let options = router.options();
            println!(
                "# compress={} known_methods={}",
                options.compress,
                options
                    .known_methods
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |m| AllowedMethods::new(m.clone()).to_string())
            );
            for route in router.routes() {
                let target = match route.target() {
                    Target::Dest(name) => name.clone(),
                    Target::Options(allowed) => format!("<options: {}>", allowed),
                    Target::MethodNotAllowed(allowed) => format!("<405: {}>", allowed),
                };
                println!(
                    "{:>4}  {:<8} {:<32} {}",
                    route.index(),
                    method_label(route.method()),
                    route.pattern(),
                    target
                );
            }
        }
        Commands::Resolve {
            config,
            url,
            method,
        } => {
            let router = build(&config)?;
            let method = method.as_deref().map(parse_method).transpose()?;
            let output = match router.resolve_url(&url, method.as_ref())? {
                Some(found) => {
                    let target = match found.route.target() {
                        Target::Dest(name) => json!({ "dest": name }),
                        Target::Options(allowed) => json!({ "options": method_names(allowed) }),
                        Target::MethodNotAllowed(allowed) => {
                            json!({ "method_not_allowed": method_names(allowed) })
                        }
                    };
                    json!({
                        "index": found.route.index(),
                        "method": method_label(found.route.method()),
                        "pattern": found.route.pattern(),
                        "target": target,
                        "params": found.params,
                    })
                }
                None => json!({ "not_found": url }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn method_names(allowed: &AllowedMethods) -> Vec<&str> {
    allowed.methods().iter().map(|m| m.as_str()).collect()
}

fn build(path: &Path) -> Result<Router<String>, Box<dyn std::error::Error>> {
    Ok(load_config(path)?.build_router()?)
}
