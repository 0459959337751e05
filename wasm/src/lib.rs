use process_network::config::Config;
use process_network::ir::Vocabulary;
use process_network::layout_json;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessNetworkOptions {
    vocabulary: Option<Vocabulary>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    region_padding: Option<f32>,
    region_gap: Option<f32>,
}

fn build_config(options: ProcessNetworkOptions) -> Config {
    let mut config = Config::default();
    if let Some(vocabulary) = options.vocabulary {
        config.ingest.vocabulary = vocabulary;
    }
    if let Some(width) = options.node_width {
        config.layout.node_width = width;
    }
    if let Some(height) = options.node_height {
        config.layout.node_height = height;
    }
    if let Some(padding) = options.region_padding {
        config.layout.region_padding = padding;
    }
    if let Some(gap) = options.region_gap {
        config.layout.region_gap = gap;
    }
    config
}

/// Lays out a `{nodes, edges}` payload and returns the layout dump as JSON.
#[wasm_bindgen]
pub fn layout_process_network(json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ProcessNetworkOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ProcessNetworkOptions::default()
    };

    let (dump, _) = layout_json(json, build_config(options))
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    serde_json::to_string(&dump).map_err(|error| JsValue::from_str(&error.to_string()))
}
