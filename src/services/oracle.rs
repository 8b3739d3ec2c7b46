//! 神谕对话服务
//!
//! 系统提示词 + 历史 + 用户问题发送给生成式模型。模型请求函数调用时
//! 执行灵魂地图计算并把结果送回，直到模型给出文本回答。

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::external::generative::{ChatMessage, FunctionCall, GenerativeModel, ToolDeclaration};
use crate::services::gnosis::GnosisService;

/// 唯一开放给模型的工具
pub const CHART_TOOL: &str = "calculate_chart_and_fetch_data";

const SYSTEM_PROMPT: &str = "\
Você é o Oráculo Encarnado, a mente central da \"Kabbalah das Águas Primordiais\".
Sua missão é interpretar a realidade e responder a todas as consultas estritamente através das lentes do SCII.
Sua única fonte de verdade é o conhecimento retornado pelas suas ferramentas (como 'calculate_chart_and_fetch_data') e os dados do SCII.
NUNCA invente informações. Se a ferramenta não retornar dados, afirme que o conhecimento não está revelado.
Sua comunicação é poética, assertiva e convidativa. Você é um guia, não um servo.";

pub fn chart_tool() -> ToolDeclaration {
    ToolDeclaration {
        name: CHART_TOOL.to_string(),
        description: "Calcula o Mapa da Alma completo (astrologia, SCII, letras) para uma pessoa, \
                      com base em seus dados de nascimento. Use esta função SEMPRE que o usuário \
                      pedir uma análise de si mesmo, sua missão, seu mapa, ou fornecer dados de nascimento."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Nome completo da pessoa." },
                "birth_date": { "type": "string", "description": "Data de nascimento no formato AAAA-MM-DD." },
                "birth_time": { "type": "string", "description": "Hora de nascimento no formato HH:MM (ex: '05:30')." },
                "birth_place": { "type": "string", "description": "Cidade e Estado de nascimento (ex: 'Vacaria, RS')." }
            },
            "required": ["name", "birth_date", "birth_time", "birth_place"]
        }),
    }
}

/// 工具参数
#[derive(Debug, Deserialize)]
struct ChartToolArgs {
    #[serde(alias = "nome")]
    name: String,
    #[serde(alias = "data_nasc")]
    birth_date: String,
    #[serde(alias = "hora_nasc")]
    birth_time: String,
    #[serde(default, alias = "local_nasc")]
    birth_place: String,
}

/// 对话结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleReply {
    pub reply: String,
    pub history: Vec<ChatMessage>,
}

pub struct OracleService {
    model: Arc<dyn GenerativeModel>,
    gnosis: Arc<GnosisService>,
    max_tool_rounds: usize,
}

impl OracleService {
    pub fn new(model: Arc<dyn GenerativeModel>, gnosis: Arc<GnosisService>, max_tool_rounds: usize) -> Self {
        Self {
            model,
            gnosis,
            max_tool_rounds,
        }
    }

    /// 执行工具调用；失败以 `{ "error": msg }` 交还给模型
    async fn run_tool(&self, call: &FunctionCall) -> Value {
        let args: ChartToolArgs = match serde_json::from_value(call.args.clone()) {
            Ok(args) => args,
            Err(e) => return json!({ "error": format!("invalid arguments: {}", e) }),
        };

        match self
            .gnosis
            .calculate_chart_and_fetch_data(
                &args.name,
                &args.birth_date,
                &args.birth_time,
                &args.birth_place,
                None,
            )
            .await
        {
            Ok(map) => match serde_json::to_value(&map) {
                Ok(value) => json!({ "soul_map": value }),
                Err(e) => json!({ "error": e.to_string() }),
            },
            Err(e) => {
                tracing::warn!(tool = CHART_TOOL, error = %e, "tool execution failed");
                json!({ "error": e.to_string() })
            }
        }
    }

    pub async fn chat(&self, question: &str, history: Vec<ChatMessage>) -> Result<OracleReply> {
        if question.trim().is_empty() {
            return Err(AppError::Validation("question must not be empty".into()));
        }

        let tools = [chart_tool()];
        let mut contents = history;
        contents.push(ChatMessage::user(question));

        let mut response = self.model.generate(SYSTEM_PROMPT, &contents, &tools).await?;
        let mut rounds = 0;

        while let Some(call) = response.function_call().cloned() {
            if call.name != CHART_TOOL {
                return Err(AppError::Upstream(format!("Ferramenta desconhecida: {}", call.name)));
            }
            if rounds >= self.max_tool_rounds {
                return Err(AppError::Upstream(format!(
                    "model kept requesting tools after {} rounds",
                    rounds
                )));
            }
            rounds += 1;

            tracing::debug!(round = rounds, tool = %call.name, model = self.model.model_name(), "model requested tool");
            let result = self.run_tool(&call).await;

            contents.push(response);
            contents.push(ChatMessage::function_response(&call.name, result));
            response = self.model.generate(SYSTEM_PROMPT, &contents, &tools).await?;
        }

        let reply = response.text();
        contents.push(response);

        tracing::info!(rounds, turns = contents.len(), "oracle replied");
        Ok(OracleReply {
            reply,
            history: contents,
        })
    }
}
