use axum::routing::get;
use axum::Router;

pub mod notes;
pub mod system;

/// Routes that run behind the tenant middleware.
pub fn router() -> Router {
    Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/:noteId",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route(
            "/characters/:characterId/notes",
            get(notes::list_character_notes).delete(notes::delete_character_notes),
        )
}
