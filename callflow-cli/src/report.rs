//! Report generation for fpbx-callflow

use anyhow::Result;
use freepbx_callflow::{
    pipeline::RouteFlow, Analysis, CallFlowNode, CallFlowReport, FlowRenderer, RenderOptions,
    ResolverOptions,
};
use serde::Serialize;

/// One route in the JSON output
#[derive(Serialize)]
struct RouteJson<'a> {
    did: &'a str,
    cid: &'a str,
    description: &'a str,
    destination: &'a str,
    flow: &'a CallFlowNode,
}

impl<'a> From<&'a RouteFlow<'a>> for RouteJson<'a> {
    fn from(flow: &'a RouteFlow<'a>) -> Self {
        Self {
            did: &flow.route.did,
            cid: &flow.route.cid,
            description: &flow.route.description,
            destination: &flow.route.destination,
            flow: &flow.root,
        }
    }
}

/// Builds the final report text
pub struct ReportWriter {
    render: RenderOptions,
    resolver: ResolverOptions,
}

impl ReportWriter {
    pub fn new(render: RenderOptions, resolver: ResolverOptions) -> Self {
        Self { render, resolver }
    }

    /// Rendered trees, one line per row, newline-terminated
    pub fn text(&self, analysis: &Analysis, did: Option<&str>) -> String {
        let renderer = FlowRenderer::new(self.render);
        let report = CallFlowReport::with_options(&analysis.model, self.resolver);

        let mut text = report
            .render(&renderer, did)
            .join("\n");
        text.push('\n');
        text
    }

    /// Resolved trees as a JSON array; a missing DID yields an empty array
    pub fn json(&self, analysis: &Analysis, did: Option<&str>) -> Result<String> {
        let report = CallFlowReport::with_options(&analysis.model, self.resolver);
        let flows: Vec<RouteFlow> = match did {
            Some(did) => report
                .route(did)
                .into_iter()
                .collect(),
            None => report.all_routes(),
        };

        let routes: Vec<RouteJson> = flows
            .iter()
            .map(RouteJson::from)
            .collect();
        let mut text = serde_json::to_string_pretty(&routes)?;
        text.push('\n');
        Ok(text)
    }
}
