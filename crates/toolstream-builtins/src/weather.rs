use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use toolstream_core::{ToolstreamError, ToolstreamResult};
use toolstream_tools::{Tool, ToolArgs, ToolSpec};
use tracing::{info, warn};

/// Public open-meteo API.
pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com";

/// Current weather lookup against the open-meteo forecast API.
///
/// Returns the forecast document as-is. A failed request is logged and
/// yields `null` so the model can carry on without it.
pub struct WeatherTool {
    spec: ToolSpec,
    client: reqwest::Client,
    base_url: String,
}

impl WeatherTool {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            spec: ToolSpec::new(
                "get_current_weather",
                "Get the current weather at a location",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "latitude": {
                            "type": "number",
                            "description": "The latitude of the location"
                        },
                        "longitude": {
                            "type": "number",
                            "description": "The longitude of the location"
                        }
                    },
                    "required": ["latitude", "longitude"],
                    "additionalProperties": false
                }),
            ),
            client,
            base_url: base_url.into(),
        }
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/v1/forecast?latitude={latitude}&longitude={longitude}\
             &current=temperature_2m&hourly=temperature_2m&daily=sunrise,sunset&timezone=auto",
            self.base_url.trim_end_matches('/')
        )
    }

    async fn fetch(&self, url: &str) -> Result<Value, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new(OPEN_METEO_URL)
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(&self, args: ToolArgs) -> ToolstreamResult<Value> {
        let latitude = number_arg(&args, "latitude")?;
        let longitude = number_arg(&args, "longitude")?;

        info!(latitude, longitude, "Fetching current weather");

        match self.fetch(&self.forecast_url(latitude, longitude)).await {
            Ok(forecast) => Ok(forecast),
            Err(e) => {
                warn!(latitude, longitude, error = %e, "Weather lookup failed");
                Ok(Value::Null)
            }
        }
    }
}

fn number_arg(args: &ToolArgs, name: &str) -> ToolstreamResult<f64> {
    args.get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolstreamError::Tool(format!("Missing numeric argument '{name}'")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(value: Value) -> ToolArgs {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_forecast_url() {
        let tool = WeatherTool::new("http://meteo.test/");
        assert_eq!(
            tool.forecast_url(51.5, -0.12),
            "http://meteo.test/v1/forecast?latitude=51.5&longitude=-0.12\
             &current=temperature_2m&hourly=temperature_2m&daily=sunrise,sunset&timezone=auto"
        );
    }

    #[tokio::test]
    async fn test_returns_forecast_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "1"))
            .and(query_param("longitude", "2"))
            .and(query_param("timezone", "auto"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"current": {"temperature_2m": 20.0}})),
            )
            .mount(&server)
            .await;

        let tool = WeatherTool::new(server.uri());
        let result = tool
            .call(args(json!({"latitude": 1, "longitude": 2})))
            .await
            .unwrap();
        assert_eq!(result["current"]["temperature_2m"], 20.0);
    }

    #[tokio::test]
    async fn test_http_failure_yields_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let tool = WeatherTool::new(server.uri());
        let result = tool
            .call(args(json!({"latitude": 1.0, "longitude": 2.0})))
            .await
            .unwrap();
        assert!(result.is_null());
    }

    #[tokio::test]
    async fn test_missing_argument_is_error() {
        let tool = WeatherTool::new("http://unused.test");
        let err = tool.call(args(json!({"latitude": 1.0}))).await.unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }
}
