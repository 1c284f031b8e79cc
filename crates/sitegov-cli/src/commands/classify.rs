use crate::support::{load_config_or_exit, print_json, site_path};
use serde_json::json;
use sitegov_kernel::RouteDescriptor;
use sitegov_kernel::service_alias::resolve_canonical;

pub fn run(config_path: &str, path: String, json_output: bool) {
    let config = load_config_or_exit(config_path);
    let base_url = config.base_url();
    let route = RouteDescriptor::from_path(&site_path(&path, base_url));
    let shape = route.validate_shape();
    let canonical = resolve_canonical(base_url, &config.registry, &route);

    if json_output {
        print_json(&json!({
            "input": path,
            "route": route,
            "canonical": canonical,
            "shapeValid": shape.is_ok(),
            "shapeError": shape.as_ref().err().map(ToString::to_string),
        }));
    } else {
        println!("sitegov classify {path}");
        println!("  Route type: {}", route.route_type);
        for (label, slot) in [
            ("City", &route.city),
            ("Service", &route.service),
            ("Industry", &route.industry),
            ("Path", &route.path),
        ] {
            if let Some(value) = slot {
                println!("  {label}: {value}");
            }
        }
        println!("  Canonical: {canonical}");
        if let Err(e) = shape {
            println!("  Shape: {e}");
        }
    }
}
