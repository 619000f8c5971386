//! Note CRUD handlers.
//!
//! Every handler runs behind the tenant middleware, builds a tenant-scoped
//! processor, and maps domain errors through [`errors::domain_error_to_response`].

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use scribe_core::{CharacterId, DomainResult, Note, NoteId};

use crate::app::dto::NoteResource;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub async fn list_notes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> Response {
    let processor = services.processor(tenant.tenant_id());
    match processor.in_tenant().get() {
        Ok(notes) => Json(resources(&notes)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_note(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(note_id): Path<String>,
) -> Response {
    let result = parse_note_id(&note_id).and_then(|id| {
        services.processor(tenant.tenant_id()).by_id(id).get()
    });
    match result {
        Ok(note) => Json(NoteResource::from_note(&note)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn create_note(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<NoteResource>,
) -> Response {
    let result: DomainResult<Note> = body.parse_input().and_then(|input| {
        services.processor(tenant.tenant_id()).create_and_emit(
            input.character_id,
            input.sender_id,
            &input.message,
            input.flag,
        )
    });
    match result {
        Ok(note) => {
            (StatusCode::CREATED, Json(NoteResource::from_note(&note))).into_response()
        }
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_note(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(note_id): Path<String>,
    Json(body): Json<NoteResource>,
) -> Response {
    let result: DomainResult<Note> = parse_note_id(&note_id).and_then(|path_id| {
        // A body id, when present, must agree with the path.
        if !body.id.is_empty() && body.parse_id()? != path_id {
            return Err(scribe_core::DomainError::validation(
                "body id does not match path",
            ));
        }
        let input = body.parse_input()?;
        services.processor(tenant.tenant_id()).update_and_emit(
            path_id,
            input.character_id,
            input.sender_id,
            &input.message,
            input.flag,
        )
    });
    match result {
        Ok(note) => Json(NoteResource::from_note(&note)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_note(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(note_id): Path<String>,
) -> Response {
    let result = parse_note_id(&note_id)
        .and_then(|id| services.processor(tenant.tenant_id()).delete_and_emit(id));
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_character_notes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(character_id): Path<String>,
) -> Response {
    let result = parse_character_id(&character_id).and_then(|id| {
        services
            .processor(tenant.tenant_id())
            .by_character(id)
            .get()
    });
    match result {
        Ok(notes) => Json(resources(&notes)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_character_notes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(character_id): Path<String>,
) -> Response {
    let result = parse_character_id(&character_id).and_then(|id| {
        services
            .processor(tenant.tenant_id())
            .delete_all_and_emit(id)
    });
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

fn parse_note_id(raw: &str) -> DomainResult<NoteId> {
    raw.parse()
}

fn parse_character_id(raw: &str) -> DomainResult<CharacterId> {
    raw.parse()
}

fn resources(notes: &[Note]) -> Vec<NoteResource> {
    notes.iter().map(NoteResource::from_note).collect()
}
