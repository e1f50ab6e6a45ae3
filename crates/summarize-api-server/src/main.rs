use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use summarize_api_server::{
    build_router,
    config::Settings,
    database::{DbPool, InMemoryStore, PersistenceStore, Repository},
    logging,
    services::{
        conversation::{EvictionPolicy, SessionMemory},
        ConversationManager, LlmProvider, LlmService, SummaryService,
    },
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::load()?;

    // Initialize logging
    let _log_guard = logging::init_tracing(&settings.logging);

    info!("🚀 Starting Summarize API Server...");
    info!("✅ Configuration loaded");

    if settings.llm.api_key.is_empty() {
        warn!("APP__LLM__API_KEY is not set; provider calls will be rejected");
    }

    // Initialize persistence
    let store: Arc<dyn PersistenceStore> = if settings.uses_database() {
        let db_pool = DbPool::new(&settings.database).await?;
        if settings.database.run_migrations {
            db_pool.run_migrations().await?;
        }
        info!("✅ Database connection established");
        Arc::new(Repository::new(db_pool))
    } else {
        warn!("No database URL configured; summaries and preferences are kept in memory");
        Arc::new(InMemoryStore::new())
    };

    // Initialize services
    let llm_service: Arc<dyn LlmProvider> = Arc::new(LlmService::new(settings.llm.clone())?);
    info!("✅ LLM client ready ({} at {})", settings.llm.model, settings.llm.base_url);

    let session_memory = SessionMemory::new(EvictionPolicy::from(&settings.session));
    let conversation_manager = Arc::new(ConversationManager::new(session_memory, llm_service.clone()));
    let summary_service = Arc::new(SummaryService::new(llm_service));

    let state = AppState::new(conversation_manager, summary_service, store);

    // Build router
    let app = build_router(state, settings.server.max_body_bytes);

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
