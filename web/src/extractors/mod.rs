pub(crate) mod authenticated_user;
pub(crate) mod validated_json;
