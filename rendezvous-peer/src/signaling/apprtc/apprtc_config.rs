/// Where the AppRTC room server lives.
#[derive(Clone, Debug)]
pub struct ApprtcConfig {
    pub origin: String,
}

impl ApprtcConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    pub(crate) fn join_url(&self, room: &str) -> String {
        format!("{}/join/{}", self.base(), room)
    }

    pub(crate) fn message_url(&self, room: &str, client_id: &str) -> String {
        format!("{}/message/{}/{}", self.base(), room, client_id)
    }

    pub(crate) fn leave_url(&self, room: &str, client_id: &str) -> String {
        format!("{}/leave/{}/{}", self.base(), room, client_id)
    }

    fn base(&self) -> &str {
        self.origin.trim_end_matches('/')
    }
}

impl Default for ApprtcConfig {
    fn default() -> Self {
        Self {
            origin: "https://appr.tc".to_owned(),
        }
    }
}
