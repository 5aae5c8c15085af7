use axum::extract::Multipart;

use docfiler_core::FileKind;

/// An uploaded file with its data and detected kind.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
    pub kind: FileKind,
}

/// Parse a multipart form upload into the single expected `file` field.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, String> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();
                let kind = FileKind::detect(&filename, &data);

                file = Some(UploadedFile {
                    filename,
                    data,
                    kind,
                });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    file.ok_or_else(|| "No file uploaded".to_string())
}
