//! Fixtures shared by the async tests.
use std::time::Duration;

use wiremock::MockServer;

use crate::update::UpdateService;
use mcp_common::http::SourceClient;
use mcp_common::http::SourceClientConfig;

/// A small guidance table in the spreadsheet export's `data` envelope.
pub const SAMPLE_LIBRARY: &str = r#"{
  "data": [
    {
      "關鍵字": "尖叫、崩潰",
      "相關主題": "情緒急救",
      "目標分頁": "情緒館",
      "推薦工具編號": "T-01",
      "工具名稱": "冷靜卡",
      "智慧引導": "先抱抱自己。💡大腦會啟動壓力反應，杏仁核拉響警報。",
      "思考引導": "此刻我最想守住的是什麼？",
      "工具錦囊": "https://tools.example.com/calm",
      "影片錦囊1": "https://youtu.be/abc123XYZ",
      "影片錦囊2": ""
    },
    {
      "關鍵字": "吼, 發火",
      "相關主題": "停止怒吼",
      "智慧引導": "你不是壞，只是太累。",
      "工具錦囊": "",
      "影片錦囊1": "https://www.youtube.com/watch?v=shout12345"
    },
    {
      "關鍵字": "作業，遲交",
      "相關主題": "學習陪伴",
      "智慧引導": "陪伴比催促更有力量。"
    },
    {
      "關鍵字": "",
      "智慧引導": ""
    }
  ]
}"#;

pub fn service_for(server: &MockServer) -> UpdateService {
    let client = SourceClient::new(SourceClientConfig {
        url: format!("{}/exec", server.uri()),
        timeout: Some(Duration::from_secs(5)),
        max_error_body_bytes: 256,
    })
    .expect("client builds");
    UpdateService::new(client)
}
