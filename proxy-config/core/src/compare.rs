//! Compares a proxy's dynamic configuration with the control plane's view of it.
//!
//! Only dynamic entries are compared, since static entries come from the proxy's bootstrap and are
//! unknown to the control plane. Version and timestamp metadata are dropped and entries are
//! sorted by name before both sides are rendered as JSON and diffed line by line. Object keys are
//! rendered in snake_case, since a control plane may describe the same field in lowerCamelCase.

use crate::config_dump::{
    Cluster, ConfigDump, Listener, ParseError, RouteConfiguration, Section,
};
use serde::Serialize;
use serde_json::Value;
use similar::TextDiff;
use std::{collections::BTreeMap, fmt, io};

#[derive(Clone, Debug)]
pub struct Comparator {
    control_plane: ConfigDump,
    proxy: ConfigDump,
    context: usize,
}

// === impl Comparator ===

impl Comparator {
    const DEFAULT_CONTEXT: usize = 7;

    /// Builds a comparator from the responses of each control plane replica and the proxy's own
    /// config dump.
    ///
    /// Replicas that are not connected to the proxy do not answer with a config dump, so the first
    /// response that parses is used.
    pub fn new<K, B>(control_plane: &BTreeMap<K, B>, proxy: &[u8]) -> Result<Self, ParseError>
    where
        K: fmt::Display,
        B: AsRef<[u8]>,
    {
        let control_plane = control_plane
            .iter()
            .find_map(|(replica, bytes)| match ConfigDump::from_slice(bytes.as_ref()) {
                Ok(dump) => {
                    tracing::debug!(%replica, "Using control plane config dump");
                    Some(dump)
                }
                Err(error) => {
                    tracing::debug!(%replica, %error, "Skipping control plane response");
                    None
                }
            })
            .ok_or(ParseError::NoControlPlaneDump)?;
        let proxy = ConfigDump::from_slice(proxy)?;

        Ok(Self {
            control_plane,
            proxy,
            context: Self::DEFAULT_CONTEXT,
        })
    }

    /// Sets the number of unchanged lines shown around each change.
    pub fn with_context(mut self, lines: usize) -> Self {
        self.context = lines;
        self
    }

    /// Writes a diff of the clusters, listeners and routes to `w`, returning the sections that
    /// differ.
    pub fn diff<W: io::Write>(&self, w: &mut W) -> io::Result<Vec<Section>> {
        let sections = [
            (
                Section::Clusters,
                render(&dynamic_clusters(&self.control_plane))?,
                render(&dynamic_clusters(&self.proxy))?,
            ),
            (
                Section::Listeners,
                render(&dynamic_listeners(&self.control_plane))?,
                render(&dynamic_listeners(&self.proxy))?,
            ),
            (
                Section::Routes,
                render(&dynamic_routes(&self.control_plane))?,
                render(&dynamic_routes(&self.proxy))?,
            ),
        ];

        let mut differ = Vec::new();
        for (section, control_plane, proxy) in sections {
            if self.diff_section(w, section, &control_plane, &proxy)? {
                differ.push(section);
            }
        }
        Ok(differ)
    }

    fn diff_section<W: io::Write>(
        &self,
        w: &mut W,
        section: Section,
        control_plane: &str,
        proxy: &str,
    ) -> io::Result<bool> {
        if control_plane == proxy {
            writeln!(w, "{} Match", section.title())?;
            return Ok(false);
        }

        let diff = TextDiff::from_lines(control_plane, proxy);
        let mut unified = diff.unified_diff();
        unified.context_radius(self.context).header(
            &format!("Control Plane {}", section.title()),
            &format!("Envoy {}", section.title()),
        );
        writeln!(w, "{unified}")?;
        Ok(true)
    }
}

fn dynamic_clusters(dump: &ConfigDump) -> Vec<&Cluster> {
    let mut clusters = dump
        .clusters()
        .map(|c| c.dynamic_active_clusters().collect::<Vec<_>>())
        .unwrap_or_default();
    clusters.sort_by(|a, b| a.name.cmp(&b.name));
    clusters
}

fn dynamic_listeners(dump: &ConfigDump) -> Vec<&Listener> {
    let mut listeners = dump
        .listeners()
        .map(|l| l.dynamic_active_listeners().collect::<Vec<_>>())
        .unwrap_or_default();
    listeners.sort_by(|a, b| a.name.cmp(&b.name));
    listeners
}

fn dynamic_routes(dump: &ConfigDump) -> Vec<RouteConfiguration> {
    let mut routes = dump
        .routes()
        .map(|r| r.dynamic_route_configs().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    for route in &mut routes {
        route.virtual_hosts.sort_by(|a, b| a.name.cmp(&b.name));
    }
    routes.sort_by(|a, b| a.name.cmp(&b.name));
    routes
}

fn render<T: Serialize>(entries: &[T]) -> io::Result<String> {
    let value = snake_case_keys(serde_json::to_value(entries)?);
    let mut json = serde_json::to_string_pretty(&value)?;
    json.push('\n');
    Ok(json)
}

fn snake_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (snake_case(&key), snake_case_keys(value)))
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(snake_case_keys).collect()),
        value => value,
    }
}

fn snake_case(key: &str) -> String {
    let mut snake = String::with_capacity(key.len() + 4);
    for (i, c) in key.char_indices() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.push(c.to_ascii_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS_V1: &str = include_str!("../testdata/details-v1.json");
    const ISTIO_POLICY: &str = "outbound|15014||istio-policy.istio-system.svc.cluster.local";

    fn replicas(dumps: Vec<(&str, Vec<u8>)>) -> BTreeMap<String, Vec<u8>> {
        dumps
            .into_iter()
            .map(|(name, bytes)| (name.to_string(), bytes))
            .collect()
    }

    fn mutate(f: impl Fn(&mut Value)) -> Vec<u8> {
        let mut dump = serde_json::from_str::<Value>(DETAILS_V1).unwrap();
        for config in dump["configs"].as_array_mut().unwrap() {
            f(config);
        }
        serde_json::to_vec(&dump).unwrap()
    }

    #[test]
    fn identical_views_match() {
        let cp = replicas(vec![("istiod-7d4b9c8f6-abcde", DETAILS_V1.into())]);
        let comparator = Comparator::new(&cp, DETAILS_V1.as_bytes()).unwrap();
        let mut out = Vec::new();
        assert_eq!(comparator.diff(&mut out).unwrap(), Vec::<Section>::new());

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "Clusters Match\nListeners Match\nRoutes Match\n");
    }

    #[test]
    fn versions_and_timestamps_are_ignored() {
        let restamped = mutate(|config| {
            for key in ["dynamic_active_clusters", "dynamic_route_configs"] {
                for entry in config[key].as_array_mut().into_iter().flatten() {
                    entry["version_info"] = "2026-10-16T00:00:00Z/42".into();
                    entry["last_updated"] = "2026-10-16T00:00:00Z".into();
                }
            }
        });
        let cp = replicas(vec![("istiod-7d4b9c8f6-abcde", restamped)]);
        let comparator = Comparator::new(&cp, DETAILS_V1.as_bytes()).unwrap();
        assert_eq!(comparator.diff(&mut io::sink()).unwrap(), Vec::<Section>::new());
    }

    #[test]
    fn entry_order_is_ignored() {
        let reordered = mutate(|config| {
            if let Some(clusters) = config["dynamic_active_clusters"].as_array_mut() {
                clusters.reverse();
            }
        });
        let cp = replicas(vec![("istiod-7d4b9c8f6-abcde", reordered)]);
        let comparator = Comparator::new(&cp, DETAILS_V1.as_bytes()).unwrap();
        assert_eq!(comparator.diff(&mut io::sink()).unwrap(), Vec::<Section>::new());
    }

    #[test]
    fn stale_clusters_differ() {
        let stale = mutate(|config| {
            if let Some(clusters) = config["dynamic_active_clusters"].as_array_mut() {
                clusters.retain(|c| c["cluster"]["name"] != ISTIO_POLICY);
            }
        });
        let cp = replicas(vec![("istiod-7d4b9c8f6-abcde", stale)]);
        let comparator = Comparator::new(&cp, DETAILS_V1.as_bytes()).unwrap();
        let mut out = Vec::new();
        assert_eq!(comparator.diff(&mut out).unwrap(), vec![Section::Clusters]);

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("--- Control Plane Clusters"), "{out}");
        assert!(out.contains("+++ Envoy Clusters"), "{out}");
        assert!(out.contains("istio-policy.istio-system.svc.cluster.local"), "{out}");
        assert!(out.contains("Listeners Match"), "{out}");
        assert!(out.contains("Routes Match"), "{out}");
    }

    fn camel_case_keys(value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| {
                        let mut parts = key.split('_');
                        let mut camel = parts.next().unwrap_or_default().to_string();
                        for part in parts {
                            let mut chars = part.chars();
                            if let Some(first) = chars.next() {
                                camel.push(first.to_ascii_uppercase());
                                camel.extend(chars);
                            }
                        }
                        (camel, camel_case_keys(value))
                    })
                    .collect(),
            ),
            Value::Array(values) => Value::Array(values.into_iter().map(camel_case_keys).collect()),
            value => value,
        }
    }

    #[test]
    fn key_case_is_ignored() {
        let dump = serde_json::from_str::<Value>(DETAILS_V1).unwrap();
        let camel = serde_json::to_vec(&camel_case_keys(dump)).unwrap();
        assert!(String::from_utf8_lossy(&camel).contains("\"connectTimeout\""));

        let cp = replicas(vec![("istiod-7d4b9c8f6-abcde", camel)]);
        let comparator = Comparator::new(&cp, DETAILS_V1.as_bytes()).unwrap();
        let mut out = Vec::new();
        assert_eq!(comparator.diff(&mut out).unwrap(), Vec::<Section>::new());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Clusters Match\nListeners Match\nRoutes Match\n"
        );
    }

    #[test]
    fn snake_case_names() {
        assert_eq!(snake_case("connectTimeout"), "connect_timeout");
        assert_eq!(snake_case("connect_timeout"), "connect_timeout");
        assert_eq!(snake_case("resourceApiVersion"), "resource_api_version");
        assert_eq!(snake_case("@type"), "@type");
    }

    #[test]
    fn skips_unconnected_replicas() {
        let cp = replicas(vec![
            ("istiod-7d4b9c8f6-aaaaa", b"Proxy not connected to this Pilot instance".to_vec()),
            ("istiod-7d4b9c8f6-bbbbb", DETAILS_V1.into()),
        ]);
        let comparator = Comparator::new(&cp, DETAILS_V1.as_bytes()).unwrap();
        assert_eq!(comparator.diff(&mut io::sink()).unwrap(), Vec::<Section>::new());
    }

    #[test]
    fn requires_a_control_plane_dump() {
        let cp = replicas(vec![(
            "istiod-7d4b9c8f6-aaaaa",
            b"Proxy not connected to this Pilot instance".to_vec(),
        )]);
        assert!(matches!(
            Comparator::new(&cp, DETAILS_V1.as_bytes()),
            Err(ParseError::NoControlPlaneDump)
        ));
    }

    #[test]
    fn requires_a_proxy_dump() {
        let cp = replicas(vec![("istiod-7d4b9c8f6-abcde", DETAILS_V1.into())]);
        assert!(matches!(
            Comparator::new(&cp, b"upstream connect error"),
            Err(ParseError::Json(_))
        ));
    }
}
