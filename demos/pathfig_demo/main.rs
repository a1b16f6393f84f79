//! # pathfig demo application
//!
//! A sample tool that loads its settings with pathfig and prints them. It
//! exists to demonstrate and manually verify pathfig's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example pathfig_demo
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                                       |
//! |------------------------|--------------------------------------------------------------------------|
//! | Defaults               | `cargo run --example pathfig_demo`                                       |
//! | Config file            | Create `pathfig-demo.config.toml` in cwd or any parent                   |
//! | Environment file set   | `cargo run --example pathfig_demo -- --config-environment=dev`           |
//! | Env var override       | `PATHFIG_DEMO__SERVER__PORT=9999 cargo run --example pathfig_demo`       |
//! | Flag override          | `cargo run --example pathfig_demo -- --server--host=0.0.0.0`             |
//! | Repeated flags         | `cargo run --example pathfig_demo -- --tags a --tags b`                  |
//! | Indexed list of tables | `cargo run --example pathfig_demo -- --upstreams[0]--url=http://a`       |
//! | Debug logs             | Install a `tracing` subscriber to see what was loaded and skipped        |
//!
//! The demo opts into `KeyStyle::Snake`, so `pool_size = 4` in a file and
//! `--database--pool-size=4` on the command line address the same field.

use pathfig::{KeyStyle, Pathfig, Populate};

#[derive(Populate, Debug)]
struct DemoConfig {
    server: Server,
    tags: Vec<String>,
    upstreams: Vec<Upstream>,
    /// Allocated on first population, then filled like any nested table.
    database: Option<Database>,
}

#[derive(Populate, Debug)]
struct Server {
    host: String,
    port: u16,
    #[config(name = "tls")]
    use_tls: bool,
}

#[derive(Populate, Default, Debug)]
struct Upstream {
    url: String,
    weight: u32,
}

#[derive(Populate, Default, Debug)]
struct Database {
    connection_uri: String,
    pool_size: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            server: Server {
                host: "127.0.0.1".into(),
                port: 8080,
                use_tls: false,
            },
            tags: Vec::new(),
            upstreams: Vec::new(),
            database: None,
        }
    }
}

fn main() {
    let loaded = Pathfig::builder()
        .app_name("pathfigDemo")
        .key_style(KeyStyle::Snake)
        .load();
    let loader = match loaded {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    for file in loader.files() {
        println!("loaded {}", file.path.display());
    }

    let mut config = DemoConfig::default();
    if let Err(e) = loader.get_all(&mut config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    println!("{config:#?}");
}
