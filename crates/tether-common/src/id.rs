/// Short, URL-safe id used to address a stored post from the render side.
pub fn new_post_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
