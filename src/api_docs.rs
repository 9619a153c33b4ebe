use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::contact::create_contact,
        api::contact::list_contacts,
        api::contact::get_contact,
        api::contact::update_contact,
        api::contact::delete_contact,
    ),
    tags(
        (name = "contact-manager", description = "Contact Manager API")
    )
)]
pub struct ApiDoc;
