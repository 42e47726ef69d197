use crate::config_dump::RoutesConfigDump;

/// Istio names virtual hosts `<host>:<port>`, or just `<host>` when the route is not bound to a
/// port.
pub fn virtual_host_name(host: &str, port: Option<u16>) -> String {
    match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Returns true if a static or dynamic route configuration has a virtual host for `host` and
/// `port`.
///
/// Virtual hosts are compared by name, which identifies a destination more reliably than the
/// name of the route configuration.
pub fn is_routing_to(dump: &RoutesConfigDump, host: &str, port: Option<u16>) -> bool {
    let name = virtual_host_name(host, port);
    dump.route_configs().any(|rc| rc.has_virtual_host(&name))
}
