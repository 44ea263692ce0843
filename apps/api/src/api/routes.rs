use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    analytics, auth, clusters, events, feedback, judging, partners, projects, registrations,
    teams, templates, users,
};
use crate::state::AppState;

/// Builds the complete HTTP router over `state`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Admin routes
        .route("/api/admin/users", get(users::list_users))
        .route("/api/admin/users/:id/role", patch(users::set_role))
        .route("/api/admin/users/:id/active", patch(users::set_active))
        .route("/api/admin/clusters", get(clusters::list_clusters))
        .route("/api/admin/analytics", get(analytics::platform_analytics))
        .route("/api/admin/analytics/events/:id", get(analytics::event_dashboard))
        // Event routes
        .route("/api/events", post(events::create_event).get(events::list_events))
        .route(
            "/api/events/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/events/:id/status", post(events::transition_event))
        .route("/api/events/:id/template", put(events::attach_template))
        .route(
            "/api/events/:id/registration-form",
            put(registrations::put_registration_form).get(registrations::get_registration_form),
        )
        .route(
            "/api/events/:id/register",
            post(registrations::register).delete(registrations::withdraw),
        )
        .route("/api/events/:id/participants", get(registrations::list_participants))
        .route(
            "/api/events/:id/teams",
            post(teams::create_team).get(teams::list_teams),
        )
        .route("/api/events/:id/projects", get(projects::list_event_projects))
        .route("/api/events/:id/judging/assignments", post(judging::create_assignment))
        .route("/api/events/:id/judging/auto-assign", post(judging::auto_assign))
        .route("/api/events/:id/leaderboard", get(judging::leaderboard))
        .route(
            "/api/events/:id/prizes",
            post(partners::create_prize).get(partners::list_prizes),
        )
        .route(
            "/api/events/:id/feedback-forms",
            post(feedback::create_form).get(feedback::list_forms),
        )
        // Team routes
        .route("/api/teams/:id", get(teams::get_team).patch(teams::update_team))
        .route("/api/teams/:id/join", post(teams::join_team))
        .route("/api/teams/:id/leave", post(teams::leave_team))
        .route("/api/teams/:id/project", post(projects::create_project))
        .route(
            "/api/teams/:id/cluster",
            post(clusters::create_cluster)
                .get(clusters::get_cluster)
                .delete(clusters::delete_cluster),
        )
        // Project routes
        .route(
            "/api/projects/:id",
            get(projects::get_project).patch(projects::update_project),
        )
        .route("/api/projects/:id/submit", post(projects::submit_project))
        .route("/api/projects/:id/builder-prompt", post(projects::builder_prompt))
        .route("/api/projects/:id/summary", get(projects::project_summary))
        .route("/api/projects/:id/scores", post(judging::submit_score))
        // Judging routes
        .route("/api/judging/assignments/:id", delete(judging::delete_assignment))
        .route("/api/judging/my-assignments", get(judging::my_assignments))
        // Partner and prize routes
        .route(
            "/api/partners",
            post(partners::create_partner).get(partners::list_partners),
        )
        .route(
            "/api/partners/:id",
            get(partners::get_partner)
                .patch(partners::update_partner)
                .delete(partners::delete_partner),
        )
        .route(
            "/api/prizes/:id",
            patch(partners::update_prize).delete(partners::delete_prize),
        )
        .route("/api/prizes/:id/award", post(partners::award_prize))
        .route("/api/prizes/:id/award/:project_id", delete(partners::revoke_prize))
        // Feedback routes
        .route(
            "/api/feedback-forms/:id",
            get(feedback::get_form)
                .patch(feedback::update_form)
                .delete(feedback::delete_form),
        )
        .route("/api/feedback-forms/:id/responses", post(feedback::submit_response))
        .route("/api/feedback-forms/:id/summary", get(feedback::form_summary))
        // Template routes
        .route(
            "/api/templates",
            post(templates::create_template).get(templates::list_templates),
        )
        .route(
            "/api/templates/:id",
            get(templates::get_template)
                .patch(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/api/templates/:id/clone", post(templates::clone_template))
        .route("/api/public/events/:slug/landing", get(templates::landing_page))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
