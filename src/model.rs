use sea_query::Value;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recorded program as supplied by the recorder, before the engine assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct NewRecorded {
    pub program_id: i64,
    pub channel_id: i64,
    pub channel_type: String,
    /// Epoch milliseconds
    pub start_at: i64,
    pub end_at: i64,
    pub duration: i64,
    pub name: String,
    pub description: Option<String>,
    pub extended: Option<String>,
    pub genre1: Option<i32>,
    pub genre2: Option<i32>,
    pub video_type: Option<String>,
    pub video_resolution: Option<String>,
    pub video_stream_content: Option<i32>,
    pub video_component_type: Option<i32>,
    pub audio_sampling_rate: Option<i32>,
    pub audio_component_type: Option<i32>,
    pub rec_path: Option<String>,
    pub rule_id: Option<i32>,
    pub thumbnail_path: Option<String>,
    pub recording: Option<bool>,
}

/// A row of the recorded table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recorded {
    pub id: i32,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub program: NewRecorded,
}

impl NewRecorded {
    /// Column name and value pairs in schema order
    pub fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("programId", self.program_id.into()),
            ("channelId", self.channel_id.into()),
            ("channelType", self.channel_type.clone().into()),
            ("startAt", self.start_at.into()),
            ("endAt", self.end_at.into()),
            ("duration", self.duration.into()),
            ("name", self.name.clone().into()),
            ("description", self.description.clone().into()),
            ("extended", self.extended.clone().into()),
            ("genre1", self.genre1.into()),
            ("genre2", self.genre2.into()),
            ("videoType", self.video_type.clone().into()),
            ("videoResolution", self.video_resolution.clone().into()),
            ("videoStreamContent", self.video_stream_content.into()),
            ("videoComponentType", self.video_component_type.into()),
            ("audioSamplingRate", self.audio_sampling_rate.into()),
            ("audioComponentType", self.audio_component_type.into()),
            ("recPath", self.rec_path.clone().into()),
            ("ruleId", self.rule_id.into()),
            ("thumbnailPath", self.thumbnail_path.clone().into()),
            ("recording", self.recording.into()),
        ]
    }
}
