//! Prompt assembly for conversation turns and report synthesis.
//!
//! The system prompt layers a base persona, mode role instructions, sector
//! guidance from the niche catalog, the report-readiness protocol, and (for
//! audits) a summary of the visitor's site. All blocks exist in French and
//! English; French is the kiosk default.

use crate::domain::foundation::{GameMode, Language, Niche};
use crate::domain::session::ConversationMessage;

/// Marker the assistant emits when it has gathered enough material for a
/// report. Stripped from replies before they reach the kiosk.
pub const READY_FOR_REPORT_FLAG: &str = "[READY_FOR_REPORT]";

const PERSONA_FR: &str = "Tu es un assistant IA conversationnel pour entrepreneurs. Tu parles français de manière chaleureuse, professionnelle et sans jargon technique. Tu vas droit au but tout en restant accueillant. Tu limites tes réponses à 3-7 échanges pour respecter le temps de la personne.";

const PERSONA_EN: &str = "You are a conversational AI assistant for entrepreneurs. You speak English in a warm, professional way without technical jargon. You get to the point while staying welcoming. You limit your exchanges to 3-7 turns to respect the person's time.";

const AUDIT_INSTRUCTIONS_FR: &str = "--- RÔLE : EXPERT CRO / AUDITEUR ---\nPHASE 1 : DIAGNOSTIC\n- Agis comme un médecin. Pose des questions sur les symptômes (taux de conversion, trafic, plaintes clients).\n- Demande quels sont les objectifs précis manqués.\n- Ne propose pas de solutions avant d'avoir diagnostiqué le problème racine.\n\nPHASE 2 : ORDONNANCE (Rapport)\n- Prépare un plan de redressement clair.";

const AUDIT_INSTRUCTIONS_EN: &str = "--- ROLE: CRO EXPERT / AUDITOR ---\nPHASE 1: DIAGNOSIS\n- Act like a doctor. Ask about symptoms (conversion rates, traffic, customer complaints).\n- Ask what specific goals are being missed.\n- Do not propose solutions before diagnosing the root cause.\n\nPHASE 2: PRESCRIPTION (Report)\n- Prepare a clear turnaround plan.";

const STARTUP_INSTRUCTIONS_FR: &str = "--- RÔLE : MENTOR & STRATÈGE EN CRÉATION D'ENTREPRISE ---\nTon objectif est d'aider l'utilisateur à BÂTIR et AMÉLIORER son concept d'entreprise de A à Z.\n\nPHASE 1 : CO-CONCEPTION (Interactif)\n- Pose des questions ciblées pour définir : la Vision, le Problème résolu, la Cible, et le Modèle de revenus.\n- Challenge les idées de l'utilisateur : \"Et si on ajoutait X ?\", \"Comment vas-tu te différencier de Y ?\".\n- Ne donne pas de plan global tout de suite. Construis brique par brique.\n\nPHASE 2 : OPTIMISATION & SCALE\n- Propose des améliorations concrètes sur le marketing, l'opérationnel ou le produit.\n- Une fois que le concept est solide et \"prêt à lancer\", signale [READY_FOR_REPORT].";

const STARTUP_INSTRUCTIONS_EN: &str = "--- ROLE: BUSINESS CREATION MENTOR & STRATEGIST ---\nYour goal is to help the user BUILD and IMPROVE their business concept from scratch.\n\nPHASE 1: CO-DESIGN (Interactive)\n- Ask targeted questions to define: Vision, Problem solved, Target audience, and Revenue model.\n- Challenge the user's ideas: \"What if we added X?\", \"How will you differentiate from Y?\".\n- Do not give a global plan immediately. Build brick by brick.\n\nPHASE 2: OPTIMIZATION & SCALE\n- Propose concrete improvements on marketing, operations, or product.\n- Once the concept is solid and \"ready to launch\", signal [READY_FOR_REPORT].";

const PORTFOLIO_INSTRUCTIONS_FR: &str = "--- RÔLE : DIRECTEUR DE CRÉATION ---\nPHASE 1 : EXTRACTION\n- Tu dois extraire les \"pépites\" des projets passés.\n- Demande des chiffres, des défis surmontés, et l'impact réel.\n- Ne te contente pas de généralités. Veux des preuves.\n\nPHASE 2 : RÉDACTION\n- Le but est de créer des études de cas irrésistibles.";

const PORTFOLIO_INSTRUCTIONS_EN: &str = "--- ROLE: CREATIVE DIRECTOR ---\nPHASE 1: EXTRACTION\n- You must extract \"nuggets\" from past projects.\n- Ask for numbers, challenges overcome, and real impact.\n- Don't settle for generalities. Demand proof.\n\nPHASE 2: COPYWRITING\n- The goal is to create irresistible case studies.";

const OUTPUT_FORMAT_FR: &str = "Quand tu as assez d'informations pour construire une stratégie complète, indique dans ta réponse [READY_FOR_REPORT]. Le backend utilisera ensuite un appel séparé pour générer le rapport structuré. N'inclus PAS le JSON du rapport dans la conversation.";

const OUTPUT_FORMAT_EN: &str = "When you have enough information to build a full strategy, include [READY_FOR_REPORT] in your response. The backend will then use a separate call to generate the structured report. Do NOT include report JSON in conversation.";

/// Builds the system prompt for one conversation turn.
///
/// `audit_summary` is only woven in for audit mode.
pub fn system_prompt(
    mode: GameMode,
    niche: Niche,
    language: Language,
    audit_summary: Option<&str>,
) -> String {
    let mut blocks = vec![
        persona(language).to_string(),
        mode_instructions(mode, language).to_string(),
        niche_guidance(niche, language),
        output_format(language).to_string(),
    ];

    if mode == GameMode::Audit {
        if let Some(summary) = audit_summary.map(str::trim).filter(|s| !s.is_empty()) {
            blocks.push(audit_context(summary, language));
        }
    }

    blocks.join("\n\n")
}

/// Builds the report synthesis prompt from a finished conversation.
pub fn report_prompt(
    conversation: &[ConversationMessage],
    mode: GameMode,
    niche: Niche,
    language: Language,
    audit_summary: Option<&str>,
) -> String {
    let conversation_text = render_conversation(conversation);

    let (verb, lang_name) = match language {
        Language::Fr => ("Génère", "français"),
        Language::En => ("Generate", "English"),
    };

    let summary_block = audit_summary
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("Site analysis summary:\n{}\n\n", s))
        .unwrap_or_default();

    let json_directive = match language {
        Language::Fr => {
            "Réponds UNIQUEMENT avec un JSON valide au format suivant, sans texte avant ni après :"
        }
        Language::En => "Respond ONLY with valid JSON in the following format, no text before or after:",
    };

    format!(
        "{verb} a structured report in {lang_name} based on the following conversation.\n\n\
         Mode: {mode}\n\
         Niche: {niche}\n\
         Language: {language}\n\n\
         Conversation:\n{conversation_text}\n\n\
         {summary_block}\
         {json_directive}\n\n\
         {{\n\
         \x20 \"mode\": \"{mode}\",\n\
         \x20 \"language\": \"{language}\",\n\
         \x20 \"sector\": \"[sector name]\",\n\
         \x20 \"summary\": \"[executive summary paragraph]\",\n\
         \x20 \"sections\": [\n\
         \x20   {{\n\
         \x20     \"title\": \"[section title]\",\n\
         \x20     \"bullets\": [\"[bullet 1]\", \"[bullet 2]\", \"...\"]\n\
         \x20   }}\n\
         \x20 ],\n\
         \x20 \"cta\": \"[call to action text]\"\n\
         }}",
        verb = verb,
        lang_name = lang_name,
        mode = mode.as_str(),
        niche = niche.as_str(),
        language = language.as_str(),
        conversation_text = conversation_text,
        summary_block = summary_block,
        json_directive = json_directive,
    )
}

/// Removes every `[READY_FOR_REPORT]` marker from an assistant reply.
///
/// Returns the cleaned text and whether the marker was present.
pub fn strip_ready_flag(text: &str) -> (String, bool) {
    if !text.contains(READY_FOR_REPORT_FLAG) {
        return (text.trim().to_string(), false);
    }
    let cleaned = text.replace(READY_FOR_REPORT_FLAG, "");
    (cleaned.trim().to_string(), true)
}

/// Renders stored messages as `User:` / `Assistant:` lines.
fn render_conversation(conversation: &[ConversationMessage]) -> String {
    conversation
        .iter()
        .map(|m| {
            let label = if m.is_user() { "User" } else { "Assistant" };
            format!("{}: {}", label, m.content())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn persona(language: Language) -> &'static str {
    match language {
        Language::Fr => PERSONA_FR,
        Language::En => PERSONA_EN,
    }
}

fn mode_instructions(mode: GameMode, language: Language) -> &'static str {
    match (mode, language) {
        (GameMode::Audit, Language::Fr) => AUDIT_INSTRUCTIONS_FR,
        (GameMode::Audit, Language::En) => AUDIT_INSTRUCTIONS_EN,
        (GameMode::Startup, Language::Fr) => STARTUP_INSTRUCTIONS_FR,
        (GameMode::Startup, Language::En) => STARTUP_INSTRUCTIONS_EN,
        (GameMode::Portfolio, Language::Fr) => PORTFOLIO_INSTRUCTIONS_FR,
        (GameMode::Portfolio, Language::En) => PORTFOLIO_INSTRUCTIONS_EN,
    }
}

fn niche_guidance(niche: Niche, language: Language) -> String {
    match language {
        Language::Fr => format!(
            "--- Secteur : {} ---\nContexte : {}.\nAdapte tes questions et tes recommandations à ce secteur.",
            niche.label(language),
            niche.descriptor(language)
        ),
        Language::En => format!(
            "--- Sector: {} ---\nContext: {}.\nTailor your questions and recommendations to this sector.",
            niche.label(language),
            niche.descriptor(language)
        ),
    }
}

fn output_format(language: Language) -> &'static str {
    match language {
        Language::Fr => OUTPUT_FORMAT_FR,
        Language::En => OUTPUT_FORMAT_EN,
    }
}

fn audit_context(summary: &str, language: Language) -> String {
    match language {
        Language::Fr => format!(
            "--- Résumé du site analysé ---\n{}\n--- Fin du résumé ---\nUtilise ce résumé pour formuler un audit précis et concret.",
            summary
        ),
        Language::En => format!(
            "--- Analyzed site summary ---\n{}\n--- End of summary ---\nUse this summary to formulate a precise and concrete audit.",
            summary
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn sample_conversation() -> Vec<ConversationMessage> {
        let at = Timestamp::now();
        vec![
            ConversationMessage::user("Bonjour, mon site convertit mal.", at).unwrap(),
            ConversationMessage::assistant("Depuis quand observez-vous cette baisse ?", at).unwrap(),
        ]
    }

    mod system {
        use super::*;

        #[test]
        fn french_audit_prompt_layers_all_blocks() {
            let prompt = system_prompt(GameMode::Audit, Niche::Restauration, Language::Fr, None);
            assert!(prompt.starts_with("Tu es un assistant IA conversationnel"));
            assert!(prompt.contains("EXPERT CRO / AUDITEUR"));
            assert!(prompt.contains("--- Secteur : Restauration ---"));
            assert!(prompt.contains(READY_FOR_REPORT_FLAG));
        }

        #[test]
        fn english_prompt_uses_english_blocks() {
            let prompt = system_prompt(GameMode::Startup, Niche::Ecommerce, Language::En, None);
            assert!(prompt.starts_with("You are a conversational AI assistant"));
            assert!(prompt.contains("BUSINESS CREATION MENTOR & STRATEGIST"));
            assert!(prompt.contains("--- Sector: E-commerce & Retail ---"));
            assert!(!prompt.contains("Tu es"));
        }

        #[test]
        fn audit_summary_is_woven_into_audit_prompts() {
            let prompt = system_prompt(
                GameMode::Audit,
                Niche::Restauration,
                Language::Fr,
                Some("Menu en PDF, pas de bouton de réservation."),
            );
            assert!(prompt.contains("--- Résumé du site analysé ---"));
            assert!(prompt.contains("Menu en PDF, pas de bouton de réservation."));
            assert!(prompt.contains("--- Fin du résumé ---"));
        }

        #[test]
        fn audit_summary_is_ignored_outside_audit_mode() {
            let prompt = system_prompt(
                GameMode::Portfolio,
                Niche::Restauration,
                Language::Fr,
                Some("ignored"),
            );
            assert!(!prompt.contains("Résumé du site analysé"));
            assert!(!prompt.contains("ignored"));
        }

        #[test]
        fn blank_audit_summary_is_ignored() {
            let prompt =
                system_prompt(GameMode::Audit, Niche::Restauration, Language::Fr, Some("   "));
            assert!(!prompt.contains("Résumé du site analysé"));
        }
    }

    mod report {
        use super::*;

        #[test]
        fn report_prompt_embeds_conversation_lines() {
            let prompt = report_prompt(
                &sample_conversation(),
                GameMode::Audit,
                Niche::Restauration,
                Language::Fr,
                None,
            );
            assert!(prompt.contains("User: Bonjour, mon site convertit mal."));
            assert!(prompt.contains("Assistant: Depuis quand observez-vous cette baisse ?"));
        }

        #[test]
        fn french_report_prompt_demands_json_only() {
            let prompt = report_prompt(
                &sample_conversation(),
                GameMode::Audit,
                Niche::Restauration,
                Language::Fr,
                None,
            );
            assert!(prompt.starts_with("Génère a structured report in français"));
            assert!(prompt.contains("Réponds UNIQUEMENT avec un JSON valide"));
            assert!(prompt.contains("\"mode\": \"audit\""));
            assert!(prompt.contains("\"language\": \"fr\""));
            assert!(prompt.contains("\"cta\""));
        }

        #[test]
        fn english_report_prompt_uses_english_directive() {
            let prompt = report_prompt(
                &sample_conversation(),
                GameMode::Startup,
                Niche::Coaching,
                Language::En,
                None,
            );
            assert!(prompt.starts_with("Generate a structured report in English"));
            assert!(prompt.contains("Respond ONLY with valid JSON"));
            assert!(prompt.contains("\"mode\": \"startup\""));
        }

        #[test]
        fn report_prompt_includes_summary_block_when_present() {
            let prompt = report_prompt(
                &sample_conversation(),
                GameMode::Audit,
                Niche::Restauration,
                Language::Fr,
                Some("Photos floues, avis absents."),
            );
            assert!(prompt.contains("Site analysis summary:\nPhotos floues, avis absents."));
        }
    }

    mod ready_flag {
        use super::*;

        #[test]
        fn strips_flag_and_reports_presence() {
            let (text, ready) =
                strip_ready_flag("Voici mon diagnostic complet. [READY_FOR_REPORT]");
            assert_eq!(text, "Voici mon diagnostic complet.");
            assert!(ready);
        }

        #[test]
        fn strips_every_occurrence() {
            let (text, ready) =
                strip_ready_flag("[READY_FOR_REPORT] Prêt. [READY_FOR_REPORT]");
            assert_eq!(text, "Prêt.");
            assert!(ready);
        }

        #[test]
        fn leaves_plain_text_untouched() {
            let (text, ready) = strip_ready_flag("Parlons de votre menu.");
            assert_eq!(text, "Parlons de votre menu.");
            assert!(!ready);
        }
    }
}
