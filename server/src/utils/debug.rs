//! Debug capture of accepted payloads as JSON lines

use std::path::Path;
use std::sync::LazyLock;

use chrono::Utc;
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Serializes appends so concurrent requests never interleave lines
static WRITE_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Serialize)]
struct DebugEntry<'a, T: Serialize> {
    timestamp: String,
    application_name: &'a str,
    data: &'a T,
}

/// Append one entry to `debug_path/filename`.
/// Failures are logged and never propagate to the request.
pub async fn write_debug<T: Serialize>(
    debug_path: &Path,
    filename: &str,
    application_name: &str,
    data: &T,
) {
    let file_path = debug_path.join(filename);
    let entry = DebugEntry {
        timestamp: Utc::now().to_rfc3339(),
        application_name,
        data,
    };

    let json = match serde_json::to_string(&entry) {
        Ok(j) => j,
        Err(e) => {
            tracing::warn!(error = %e, filename, "Failed to serialize debug entry");
            return;
        }
    };

    let _guard = WRITE_LOCK.lock().await;

    let result = async {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        file.write_all(json.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok::<_, std::io::Error>(())
    }
    .await;

    if let Err(e) = result {
        tracing::warn!(
            error = %e,
            path = %file_path.display(),
            "Failed to write debug entry"
        );
    }
}
