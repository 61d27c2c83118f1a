//! # R&D Portal Binary
//!
//! The entry point that assembles the portal from compile-time features
//! and drives it from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rp_config::{Settings, StorageBackend};
use rp_core::models::SiteConfigPatch;
use rp_core::traits::{CompletionGateway, KvStore};
use rp_portal::{
    NewPost, Persona, Portal, PortalOptions, PromptTemplate, LAB_TOPICS, OFFICE_TEMPLATES, RND_TEMPLATES,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Feature-gated imports: the binary is compiled to order
#[cfg(feature = "storage-local")]
use rp_storage_local::LocalKvStore;

#[cfg(feature = "kv-sqlite")]
use rp_kv_sqlite::SqliteKvStore;

#[cfg(feature = "auth-open")]
use rp_auth_open::OpenAccessPolicy;

#[cfg(feature = "gateway-llm")]
use rp_gateway_llm::LlmGateway;

#[cfg(not(feature = "auth-open"))]
compile_error!("an access policy plugin is required; enable the `auth-open` feature");

#[derive(Parser)]
#[command(name = "rnd-portal")]
#[command(about = "R&D portal content, gallery board and AI assistants", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, env = "PORTAL_CONFIG")]
    config: Option<PathBuf>,

    /// Display name to act as; the default administrator otherwise
    #[arg(long, requires_all = ["email", "department"])]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    department: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Landing-page copy and notice banner
    Home,
    /// The session identity and progression
    Whoami,
    /// All gallery posts, newest first
    Board,
    /// Publish a gallery post
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Comment on a post
    Comment { post_id: String, text: String },
    /// Like a post
    Like { post_id: String },
    /// Edit landing-page copy (admin)
    Site {
        #[arg(long)]
        main_title: Option<String>,
        #[arg(long)]
        main_subtitle: Option<String>,
        #[arg(long)]
        main_description: Option<String>,
        #[arg(long)]
        notice_title: Option<String>,
        #[arg(long)]
        notice_content: Option<String>,
        #[arg(long)]
        show_notice: Option<bool>,
    },
    /// Ask an assistant
    Ask {
        #[arg(long, value_enum, default_value_t = PersonaArg::Rnd)]
        persona: PersonaArg,
        /// Template id (office and workbench personas); for the workbench
        /// an empty prompt sends the template text as is
        #[arg(long)]
        template: Option<String>,
        /// Lab topic number (lab persona only); replaces the prompt
        #[arg(long)]
        topic: Option<usize>,
        #[arg(default_value = "")]
        prompt: String,
    },
    /// Prompt templates and lab topics
    Templates,
}

#[derive(Clone, Copy, ValueEnum)]
enum PersonaArg {
    Rnd,
    Office,
    Lab,
    Workbench,
}

impl From<PersonaArg> for Persona {
    fn from(arg: PersonaArg) -> Self {
        match arg {
            PersonaArg::Rnd => Persona::Rnd,
            PersonaArg::Office => Persona::Office,
            PersonaArg::Lab => Persona::Lab,
            PersonaArg::Workbench => Persona::Workbench,
        }
    }
}

/// Stand-in when the binary is built without a gateway plugin.
#[cfg(not(feature = "gateway-llm"))]
struct OfflineGateway;

#[cfg(not(feature = "gateway-llm"))]
#[async_trait::async_trait]
impl CompletionGateway for OfflineGateway {
    async fn generate(&self, _prompt: &str, _system: &str, _model: &str) -> anyhow::Result<String> {
        anyhow::bail!("built without a completion gateway")
    }

    fn is_configured(&self) -> bool {
        false
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.logging.level.clone().into());

    // Logs go to stderr so command output stays pipeable
    if settings.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn build_storage(settings: &Settings) -> anyhow::Result<Arc<dyn KvStore>> {
    match settings.storage.backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::File => Ok(Arc::new(LocalKvStore::new(settings.storage.path.clone()))),
        #[cfg(feature = "kv-sqlite")]
        StorageBackend::Sqlite => Ok(Arc::new(
            SqliteKvStore::new(&settings.storage.sqlite_url)
                .await
                .context("failed to open sqlite storage")?,
        )),
        StorageBackend::Memory => Ok(Arc::new(rp_core::memory::MemoryKvStore::new())),
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("storage backend {other:?} is not compiled into this build"),
    }
}

#[cfg(feature = "gateway-llm")]
fn build_gateway(settings: &mut Settings) -> anyhow::Result<Arc<dyn CompletionGateway>> {
    let api_key = settings.gateway.api_key.take();
    Ok(Arc::new(LlmGateway::new(&settings.gateway.provider, api_key)?))
}

#[cfg(not(feature = "gateway-llm"))]
fn build_gateway(_settings: &mut Settings) -> anyhow::Result<Arc<dyn CompletionGateway>> {
    Ok(Arc::new(OfflineGateway))
}

fn find_template<'a>(catalog: &'a [PromptTemplate], id: &str) -> anyhow::Result<&'a PromptTemplate> {
    catalog
        .iter()
        .find(|t| t.id == id)
        .with_context(|| format!("unknown template {id:?}"))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings);

    // 1. Initialize Storage Implementation
    let storage = build_storage(&settings).await?;

    // 2. Initialize Gateway Implementation
    let gateway = build_gateway(&mut settings)?;

    // 3. Assemble the portal: site and board load before anything reads them
    let portal = Portal::init(
        storage,
        Box::new(OpenAccessPolicy::new()),
        gateway,
        PortalOptions {
            model: settings.gateway.model.clone(),
            level_up: settings.progression.level_up,
        },
    )
    .await;

    if let (Some(name), Some(email), Some(department)) = (&cli.name, &cli.email, &cli.department) {
        portal.login(name, email, department).await;
    }

    run(&portal, cli.command).await
}

async fn run(portal: &Portal, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Home => {
            let config = portal.site.config().await;
            println!("{}\n{}\n\n{}", config.main_subtitle, config.main_title, config.main_description);
            if config.show_notice {
                println!("\n{} {}", config.notice_title, config.notice_content);
            }
        }
        Command::Whoami => print_json(&portal.identity.current().await)?,
        Command::Board => print_json(&portal.board.posts().await)?,
        Command::Post {
            title,
            content,
            tags,
            image_url,
        } => {
            let post = portal
                .publish_post(NewPost {
                    title,
                    content,
                    tags,
                    image_url,
                })
                .await?;
            print_json(&post)?;
        }
        Command::Comment { post_id, text } => {
            let comment = portal.comment_on(&post_id, &text).await?;
            print_json(&comment)?;
        }
        Command::Like { post_id } => {
            let likes = portal.like(&post_id).await?;
            println!("{likes}");
        }
        Command::Site {
            main_title,
            main_subtitle,
            main_description,
            notice_title,
            notice_content,
            show_notice,
        } => {
            let config = portal
                .save_site_config(SiteConfigPatch {
                    main_title,
                    main_subtitle,
                    main_description,
                    notice_title,
                    notice_content,
                    show_notice,
                })
                .await?;
            print_json(&config)?;
        }
        Command::Ask {
            persona,
            template,
            topic,
            prompt,
        } => {
            let persona = Persona::from(persona);
            let assistant = portal.assistant(persona);
            let answer = match (persona, template, topic) {
                (Persona::Office, Some(id), _) => {
                    let template = find_template(OFFICE_TEMPLATES, &id)?;
                    assistant.compose(template, &prompt).await?
                }
                (Persona::Workbench, Some(id), _) => {
                    let template = find_template(RND_TEMPLATES, &id)?;
                    let prefilled = assistant.select_template(template).await?;
                    let text = if prompt.trim().is_empty() { prefilled } else { prompt.as_str() };
                    assistant.send(text).await?.map(|reply| reply.text)
                }
                (Persona::Lab, _, Some(n)) => {
                    let topic = LAB_TOPICS
                        .get(n.wrapping_sub(1))
                        .with_context(|| format!("no lab topic #{n}"))?;
                    assistant.start_topic(topic).await?.map(|reply| reply.text)
                }
                _ => assistant.send(&prompt).await?.map(|reply| reply.text),
            };
            match answer {
                Some(text) => println!("{text}"),
                None => anyhow::bail!("nothing to send"),
            }
        }
        Command::Templates => {
            for (heading, catalog) in [("R&D templates:", RND_TEMPLATES), ("Office templates:", OFFICE_TEMPLATES)] {
                println!("{heading}");
                for t in catalog {
                    println!("  {:<10} [{}] {} - {}", t.id, t.category, t.title, t.description);
                }
            }
            println!("Lab topics:");
            for (i, t) in LAB_TOPICS.iter().enumerate() {
                println!("  {}. {} - {}", i + 1, t.title, t.prompt);
            }
        }
    }
    Ok(())
}
