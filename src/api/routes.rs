//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, patch, post, put};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{
    self, ConversationResponse, CreateConversationRequest, CreateMessageRequest, CreateTaskRequest,
    ErrorResponse, HealthResponse, LoginRequest, LoginResponse, MessageResponse,
    PaginatedConversations, PaginatedMessages, PaginatedTasks, RegisterRequest, RegisterResponse,
    RootResponse, TaskResponse, UpdateConversationRequest, UpdateTaskRequest,
    UpdateTaskStatusRequest, VerifyResponse,
};
use super::state::AppState;
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskchat API",
        version = "0.1.0",
        description = "To-do/chat backend: users, conversations, messages, tasks",
        license(name = "MIT")
    ),
    paths(
        handlers::root,
        handlers::health,
        handlers::register,
        handlers::login,
        handlers::verify,
        handlers::create_conversation,
        handlers::list_conversations,
        handlers::get_conversation,
        handlers::update_conversation_title,
        handlers::list_conversation_messages,
        handlers::create_conversation_message,
        handlers::list_conversation_tasks,
        handlers::create_task,
        handlers::list_tasks,
        handlers::get_task,
        handlers::update_task,
        handlers::update_task_status,
        handlers::delete_task,
    ),
    components(
        schemas(
            RootResponse,
            HealthResponse,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            VerifyResponse,
            ConversationResponse,
            CreateConversationRequest,
            UpdateConversationRequest,
            PaginatedConversations,
            MessageResponse,
            CreateMessageRequest,
            PaginatedMessages,
            TaskResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            UpdateTaskStatusRequest,
            PaginatedTasks,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "Liveness probes"),
        (name = "auth", description = "Registration, login, token verification"),
        (name = "conversations", description = "Conversation and message endpoints"),
        (name = "tasks", description = "Task CRUD endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation.
///
/// CORS is wide open, mirroring the deployment posture of a development
/// backend fronted by a browser client.
pub fn create_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let api = ApiDoc::openapi();

    // System routes (non-generic)
    let system_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    let auth_routes = routes!(D => {
        post "/auth/register" => handlers::register,
        post "/auth/login" => handlers::login,
        post "/auth/verify" => handlers::verify,
    });

    let conversation_routes = routes!(D => {
        post "/api/{user_id}/conversations" => handlers::create_conversation,
        get "/api/{user_id}/conversations" => handlers::list_conversations,
        get "/api/{user_id}/conversations/{conversation_id}" => handlers::get_conversation,
        put "/api/{user_id}/conversations/{conversation_id}" => handlers::update_conversation_title,
        get "/api/{user_id}/conversations/{conversation_id}/messages" => handlers::list_conversation_messages,
        post "/api/{user_id}/conversations/{conversation_id}/messages" => handlers::create_conversation_message,
        get "/api/{user_id}/conversations/{conversation_id}/tasks" => handlers::list_conversation_tasks,
    });

    let task_routes = routes!(D => {
        post "/api/{user_id}/tasks" => handlers::create_task,
        get "/api/{user_id}/tasks" => handlers::list_tasks,
        get "/api/{user_id}/tasks/{task_id}" => handlers::get_task,
        patch "/api/{user_id}/tasks/{task_id}" => handlers::update_task,
        put "/api/{user_id}/tasks/{task_id}/status" => handlers::update_task_status,
        delete "/api/{user_id}/tasks/{task_id}" => handlers::delete_task,
    });

    system_routes
        .merge(auth_routes)
        .merge(conversation_routes)
        .merge(task_routes)
        .merge(Scalar::with_url("/docs", api))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
