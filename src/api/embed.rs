//! Embed markup for playing a video on a web page

use super::client::CatalystClientGeneric;
use crate::config::{EmbedKind, EmbedSettings};
use crate::transport::Transport;
use crate::types::VideoDetails;
use crate::{Error, Result};

const FLOWPLAYER_SWF: &str = "flowplayer-3.2.1.swf";

/// Rendering options; defaults come from the `[embed]` settings
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedOptions {
    pub kind: EmbedKind,
    pub width: u32,
    pub height: f64,
    pub controls: bool,
    pub autoplay: bool,
    pub preload: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self::from(&EmbedSettings::default())
    }
}

impl From<&EmbedSettings> for EmbedOptions {
    fn from(settings: &EmbedSettings) -> Self {
        Self {
            kind: settings.kind,
            width: settings.width,
            height: settings.height,
            controls: settings.controls,
            autoplay: settings.autoplay,
            preload: settings.preload,
        }
    }
}

impl EmbedOptions {
    pub fn with_kind(mut self, kind: EmbedKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_size(mut self, width: u32, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn rounded_height(&self) -> i64 {
        self.height.round() as i64
    }

    /// Height as given, without a trailing `.0`
    fn exact_height(&self) -> String {
        if self.height.fract() == 0.0 {
            format!("{}", self.height as i64)
        } else {
            self.height.to_string()
        }
    }
}

/// Flash player URL for a video
///
/// `http://host/api/video/index/` with key `abc` becomes `http://host/v/abc`.
pub fn flash_url(api_url: &str, access_key: &str) -> String {
    let trimmed = api_url.trim_end_matches('/');
    format!("{}{}", trimmed.replace("/api/video/index", "/v/"), access_key)
}

/// Progressive MP4 URL derived from the streaming URL
pub fn mp4_url(video_url: &str) -> String {
    video_url.replace("rtmp://fms", "http://wpc")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(name, "not returned for this video"))
}

/// Render embed markup for a video
pub fn render_embed(api_url: &str, details: &VideoDetails, options: &EmbedOptions) -> Result<String> {
    let width = options.width;

    let markup = match options.kind {
        EmbedKind::Flash => {
            let flash = escape_attr(&flash_url(api_url, required(&details.access_key, "access_key")?));
            let height = options.rounded_height();
            format!(
                r#"<object width="{width}" height="{height}" data="{flash}" type="application/x-shockwave-flash">
  <param name="allowScriptAccess" value="never">
  <param name="allowNetworking" value="internal">
  <param name="wmode" value="opaque">
  <param name="movie" value="{flash}">
  <param name="allowFullScreen" value="true">
  <embed src="{flash}" type="application/x-shockwave-flash" width="{width}" height="{height}" allowscriptaccess="never" allownetworking="internal">
    <p class="flash_js_notice" style="background: #ffffcc; color: black !important; text-align: center;">
      <a href="http://get.adobe.com/flashplayer/">Flash Player is required to view this file / Flash Player est nécessaire pour afficher ce fichier</a>.
    </p>
</object>"#
            )
        }
        EmbedKind::Mobile => {
            let mp4 = escape_attr(&mp4_url(required(&details.video_url, "video_url")?));
            let mut tag = format!(
                r#"<video src="{mp4}" width="{width}" height="{}""#,
                options.rounded_height()
            );
            if options.preload {
                tag.push_str(" preload");
            }
            if options.controls {
                tag.push_str(" controls");
            }
            if options.autoplay {
                tag.push_str(" autoplay");
            }
            tag.push_str("></video>");
            tag
        }
        EmbedKind::Hybrid => {
            let mp4 = escape_attr(&mp4_url(required(&details.video_url, "video_url")?));
            let flash = escape_attr(&flash_url(api_url, required(&details.access_key, "access_key")?));
            let height = options.exact_height();
            format!(
                r#"<video id="movie" width="{width}" height="{height}" preload controls>
  <source src="{mp4}" type="video/mp4"/>
  <object width="{width}" height="{height}" type="application/x-shockwave-flash" data="{FLOWPLAYER_SWF}">
    <param name="movie" value="{FLOWPLAYER_SWF}" />
    <param name="allowfullscreen" value="true" />
    <param name="flashvars" value='config={{"clip": {{"url": "{flash}", "autoPlay":false, "autoBuffering":true}}}}' />
  </object>
</video>
<script>
  var v = document.getElementById("movie");
  v.onclick = function() {{
    if (v.paused) {{
      v.play();
    }} else {{
      v.pause();
    }}
  }};
</script>"#
            )
        }
    };

    Ok(markup)
}

impl<T> CatalystClientGeneric<T>
where
    T: Transport + ?Sized + 'static,
{
    /// Fetch a video and render its embed markup
    ///
    /// `options` falls back to the configured `[embed]` section.
    pub async fn embed(&self, video_id: &str, options: Option<EmbedOptions>) -> Result<String> {
        let details = self.fetch_details(video_id).await?;
        let options = options.unwrap_or_else(|| EmbedOptions::from(&self.settings().embed));
        render_embed(&self.settings().api.url, &details, &options)
    }
}
