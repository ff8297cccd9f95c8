use bytes::Bytes;
use chrono::Utc;

use crate::core::{CoreError, CoreResult};
use crate::storage::DriveClient;

/// A receipt file pulled out of the expense form.
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub file_name: String,
    pub bytes: Bytes,
}

pub fn receipt_path(timestamp_millis: i64, original_name: &str) -> String {
    format!("/expenses-bill/{timestamp_millis}-{}", sanitize_name(original_name))
}

fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "receipt".to_string()
    } else {
        cleaned
    }
}

/// Uploads every receipt and returns one direct-view URL per file, in
/// input order. Every file is attempted even after a failure; the error
/// names each file that did not make it so the operator knows what to
/// retry.
pub async fn upload_attachments(
    drive: &DriveClient,
    files: &[AttachmentFile],
) -> CoreResult<Vec<String>> {
    let mut urls = Vec::with_capacity(files.len());
    let mut failed = Vec::new();

    for file in files {
        let path = receipt_path(Utc::now().timestamp_millis(), &file.file_name);
        match upload_one(drive, &path, file).await {
            Ok(url) => urls.push(url),
            Err(error) => {
                tracing::warn!(file = %file.file_name, error = %error, "receipt upload failed");
                failed.push(file.file_name.clone());
            }
        }
    }

    if failed.is_empty() {
        Ok(urls)
    } else {
        Err(CoreError::Attachments { failed })
    }
}

async fn upload_one(drive: &DriveClient, path: &str, file: &AttachmentFile) -> CoreResult<String> {
    drive.upload(path, file.bytes.clone()).await?;
    let link = drive.get_or_create_share_link(path).await?;
    Ok(DriveClient::to_direct_view(&link))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_paths_are_timestamped_under_the_expenses_folder() {
        assert_eq!(
            receipt_path(1756100000000, "petrol bill.jpg"),
            "/expenses-bill/1756100000000-petrol_bill.jpg"
        );
    }

    #[test]
    fn path_separators_in_names_are_neutralised() {
        assert_eq!(sanitize_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_name(""), "receipt");
    }
}
