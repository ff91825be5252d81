//! The blob storage walkthrough served at `/storage`.

use std::collections::HashMap;
use std::sync::Arc;

use switchyard::Response;

use crate::config::Config;
use crate::context::RequestContext;
use crate::store::ObjectAttrs;

pub const DEMO_FILE: &str = "demo-testfile-rust";

const DEMO_CONTENT: &str = "abcde\n";

// One MiB of repeated lines.
const DEMO_REPEAT: usize = 1024 * 1024 / DEMO_CONTENT.len();

/// Accumulates the text log of one demo run and the files to clean up.
struct Demo<'a> {
    ctx: &'a RequestContext,
    bucket: &'a str,
    log: String,
    created: Vec<String>,
    failed: bool,
}

impl<'a> Demo<'a> {
    fn new(ctx: &'a RequestContext, bucket: &'a str) -> Self {
        Self {
            ctx,
            bucket,
            log: String::new(),
            created: Vec::new(),
            failed: false,
        }
    }

    fn line(&mut self, text: &str) {
        self.log.push_str(text);
        self.log.push('\n');
    }

    fn fail(&mut self, text: String) {
        tracing::error!(request_id = self.ctx.request_id(), bucket = self.bucket, "{text}");
        self.failed = true;
        self.line(&text);
    }

    async fn create_file(&mut self, name: &str) {
        let (ctx, bucket) = (self.ctx, self.bucket);
        self.line(&format!("Creating file /{bucket}/{name}"));
        let attrs = ObjectAttrs {
            content_type: "text/plain".to_string(),
            metadata: HashMap::from([
                ("x-goog-meta-foo".to_string(), "foo".to_string()),
                ("x-goog-meta-bar".to_string(), "bar".to_string()),
            ]),
        };
        let data = DEMO_CONTENT.repeat(DEMO_REPEAT).into_bytes();
        match ctx.blobs().write(bucket, name, attrs, data).await {
            Ok(()) => self.created.push(name.to_string()),
            Err(err) => self.fail(format!(
                "createFile: unable to write data to bucket {bucket:?}, file {name:?}: {err}"
            )),
        }
    }

    async fn read_file(&mut self, name: &str) {
        let (ctx, bucket) = (self.ctx, self.bucket);
        self.line("");
        self.line("Abbreviated file content (first line):");
        match ctx.blobs().read(bucket, name).await {
            Ok(data) => {
                let text = String::from_utf8_lossy(&data);
                self.line(text.lines().next().unwrap_or_default());
            }
            Err(err) => self.fail(format!(
                "readFile: unable to read data from bucket {bucket:?}, file {name:?}: {err}"
            )),
        }
    }

    async fn delete_files(&mut self) {
        let (ctx, bucket) = (self.ctx, self.bucket);
        self.line("");
        self.line("Deleting files...");
        for name in std::mem::take(&mut self.created) {
            self.line(&format!("Deleting file {name}"));
            if let Err(err) = ctx.blobs().delete(bucket, &name).await {
                self.fail(format!(
                    "deleteFiles: unable to delete bucket {bucket:?}, file {name:?}: {err}"
                ));
            }
        }
    }
}

/// Creates a file, reads it back, and deletes every file created.
pub async fn storage_demo(ctx: RequestContext, config: Arc<Config>) -> Response {
    if config.bucket.is_empty() {
        tracing::error!("no bucket configured for the storage demo");
        return Response::text("no bucket configured").status(500);
    }

    let mut demo = Demo::new(&ctx, &config.bucket);
    demo.line(&format!(
        "Demo Application running from version: {}",
        env!("CARGO_PKG_VERSION")
    ));
    demo.line(&format!("Using bucket name: {}", config.bucket));
    demo.line("");

    demo.create_file(DEMO_FILE).await;
    demo.read_file(DEMO_FILE).await;
    demo.delete_files().await;

    demo.line("");
    if demo.failed {
        demo.line("Demo failed.");
    } else {
        demo.line("Demo Succeeded.");
    }
    Response::text(demo.log)
}
