use actix_multipart::{Field, Multipart};
use actix_web::{post, web, HttpRequest};
use futures_util::TryStreamExt;

use crate::api::{error, success};
use crate::middlewares::{acting_as, get_claims};
use crate::modules::upload::{model::UploadResponse, service::UploadService};

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, error::Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) =
        field.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err(error::Error::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Stores the first file field of a multipart body. An optional `userId`
/// text field names the owner; it defaults to the caller.
#[post("")]
pub async fn upload_file(
    req: HttpRequest,
    upload_service: web::Data<UploadService>,
    mut payload: Multipart,
) -> Result<success::Success<UploadResponse>, error::Error> {
    let limit = upload_service.max_file_size();
    let mut user_key = None;
    let mut file = None;

    while let Some(mut field) =
        payload.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
    {
        if field.name() == Some("userId") {
            let raw = read_field(&mut field, 256).await?;
            let key = String::from_utf8(raw)
                .map_err(|_| error::Error::bad_request("User id must be valid UTF-8"))?;
            user_key = Some(key.trim().to_string());
            continue;
        }

        if file.is_some() {
            continue;
        }

        let Some(file_name) =
            field.content_disposition().and_then(|cd| cd.get_filename()).map(str::to_string)
        else {
            continue;
        };

        let mime_type = field.content_type().map(|m| m.essence_str().to_string());
        file = Some((file_name, mime_type, read_field(&mut field, limit).await?));
    }

    let Some((file_name, mime_type, bytes)) = file else {
        return Err(error::Error::bad_request("No file found in request"));
    };

    let user_key = match user_key {
        Some(key) => {
            acting_as(&req, &key)?;
            key
        }
        None => get_claims(&req)?.sub,
    };

    let uploaded = upload_service.upload_file(&user_key, file_name, bytes, mime_type).await?;
    Ok(success::Success::created(Some(uploaded)).message("File uploaded successfully"))
}
