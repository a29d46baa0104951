//! Narrowing the project to the requested services.

use decompose_common::types::Service;

/// Returns the services in scope, in declaration order.
///
/// An empty inclusion list keeps every service.
pub fn filter_services<'a>(services: &'a [Service], include: &[String]) -> Vec<&'a Service> {
    if include.is_empty() {
        return services.iter().collect();
    }
    services
        .iter()
        .filter(|s| include.iter().any(|name| *name == s.name))
        .collect()
}
