//! The notes JSON API, mounted at `/notes`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchyard::{BoxFuture, Collection, Injector, Next, PathParams, Request, Response};

use crate::context::RequestContext;
use crate::error::StoreError;
use crate::render::Render;

pub const NOTE_KIND: &str = "Note";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Note {
    #[serde(rename = "ID")]
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

/// Request and response envelope for a single note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoteMessage {
    pub note: Note,
}

/// Status message returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            link: None,
        }
    }

    #[must_use]
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

fn note_link(id: i64) -> String {
    format!("/Note/{id}")
}

/// Note storage bound to one request's context.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    ctx: RequestContext,
}

impl NoteRepository {
    pub fn new(ctx: RequestContext) -> Self {
        Self { ctx }
    }

    /// Stores a new note at version 1 and returns its id.
    pub async fn insert(&self, content: &str) -> Result<i64, StoreError> {
        let note = Note {
            id: 0,
            content: content.to_string(),
            created_at: Utc::now(),
            version: 1,
        };
        let id = self
            .ctx
            .datastore()
            .put(NOTE_KIND, None, serde_json::to_value(&note)?)
            .await?;
        tracing::debug!(request_id = self.ctx.request_id(), note_id = id, "note created");
        Ok(id)
    }

    pub async fn find(&self, id: i64) -> Result<Note, StoreError> {
        let value = self.ctx.datastore().get(NOTE_KIND, id).await?;
        let mut note: Note = serde_json::from_value(value)?;
        note.id = id;
        Ok(note)
    }

    pub async fn find_all(&self) -> Result<Vec<Note>, StoreError> {
        self.ctx
            .datastore()
            .get_all(NOTE_KIND)
            .await?
            .into_iter()
            .map(|(id, value)| -> Result<Note, StoreError> {
                let mut note: Note = serde_json::from_value(value)?;
                note.id = id;
                Ok(note)
            })
            .collect()
    }

    /// Replaces the content of an existing note.
    ///
    /// The creation time is kept and the version incremented. A note
    /// deleted concurrently stays deleted.
    pub async fn update(&self, id: i64, content: &str) -> Result<Note, StoreError> {
        let content = content.to_string();
        let value = self
            .ctx
            .datastore()
            .update(
                NOTE_KIND,
                id,
                Box::new(move |current: Value| -> Result<Value, StoreError> {
                    let existing: Note = serde_json::from_value(current)?;
                    let note = Note {
                        id,
                        content,
                        created_at: existing.created_at,
                        version: existing.version + 1,
                    };
                    Ok(serde_json::to_value(&note)?)
                }),
            )
            .await?;
        let mut note: Note = serde_json::from_value(value)?;
        note.id = id;
        Ok(note)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.ctx.datastore().delete(NOTE_KIND, id).await
    }
}

/// Binds a [`NoteRepository`] for the current request.
pub fn note_repository(mut injector: Injector, next: Next) -> BoxFuture<'static, switchyard::Result<Response>> {
    Box::pin(async move {
        let ctx: RequestContext = injector.resolve()?;
        injector.register_scoped(NoteRepository::new(ctx));
        next.run(injector).await
    })
}

fn note_id(render: &Render, params: &PathParams) -> Result<i64, Response> {
    params
        .parse::<i64>("noteId")
        .ok_or_else(|| render.json(400, &Message::new("Invalid note id")))
}

fn store_failure(render: &Render, err: &StoreError) -> Response {
    if err.is_not_found() {
        return render.json(404, &Message::new(err.to_string()));
    }
    tracing::error!(error = %err, "note storage failed");
    render.json(500, &Message::new(err.to_string()))
}

pub async fn note_index(repo: NoteRepository, render: Render) -> Response {
    match repo.find_all().await {
        Ok(notes) => render.json(200, &notes),
        Err(err) => store_failure(&render, &err),
    }
}

pub async fn note_create(request: Request, repo: NoteRepository, render: Render) -> Response {
    let Ok(body) = request.json::<NoteMessage>() else {
        return render.json(400, &Message::new("Invalid JSON"));
    };
    match repo.insert(&body.note.content).await {
        Ok(id) => render.json(201, &Message::new("Created!").link(note_link(id))),
        Err(err) => store_failure(&render, &err),
    }
}

pub async fn note_show(params: PathParams, repo: NoteRepository, render: Render) -> Response {
    let id = match note_id(&render, &params) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match repo.find(id).await {
        Ok(note) => render.json(200, &NoteMessage { note }),
        Err(err) => store_failure(&render, &err),
    }
}

pub async fn note_update(
    params: PathParams,
    request: Request,
    repo: NoteRepository,
    render: Render,
) -> Response {
    let id = match note_id(&render, &params) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let Ok(body) = request.json::<NoteMessage>() else {
        return render.json(400, &Message::new("Invalid JSON"));
    };
    match repo.update(id, &body.note.content).await {
        Ok(_) => render.json(200, &Message::new("Updated").link(note_link(id))),
        Err(err) => store_failure(&render, &err),
    }
}

pub async fn note_delete(params: PathParams, repo: NoteRepository, render: Render) -> Response {
    let id = match note_id(&render, &params) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match repo.delete(id).await {
        Ok(()) => render.json(200, &Message::new("Deleted")),
        Err(err) => store_failure(&render, &err),
    }
}

/// Routes of the notes API, relative to the mount prefix.
pub fn collection() -> Collection {
    Collection::new()
        .middleware(note_repository)
        .get("/", note_index)
        .post("/", note_create)
        .get("/:noteId", note_show)
        .put("/:noteId", note_update)
        .delete("/:noteId", note_delete)
}
