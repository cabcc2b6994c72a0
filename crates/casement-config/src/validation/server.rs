use crate::schema::CasementConfig;

use super::helpers::validate_non_empty;

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &CasementConfig) {
    let server = &config.server;
    validate_non_empty(errors, "server.bind", &server.bind);
    if server.port == 0 {
        errors.push("server.port must be non-zero".into());
    }
    if !server.path.starts_with('/') {
        errors.push(format!(
            "server.path = {:?} must start with '/'",
            server.path
        ));
    }
}
