//! Assembly of the Krishna instruction document.
//!
//! Pure and deterministic: same inputs, byte-identical output. Everything
//! user-supplied (`name`, `message`, history text) is interpolated verbatim;
//! there is no escaping of text that collides with the block markers.

use crate::chat::types::{ChatTurn, Speaker};
use crate::llm::gender::Gender;
use crate::persona::krishna::{HISTORY_CLOSE, HISTORY_OPEN, PERSONA_LABEL, QUESTION_CLOSE};

/// Number of prior turns carried into each prompt (three exchanges).
pub const CONTEXT_WINDOW_TURNS: usize = 6;

/// Render the prior-conversation block: the last [`CONTEXT_WINDOW_TURNS`]
/// turns, oldest first, one line per turn. Empty history renders nothing,
/// not even the markers.
fn render_history(name: &str, history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let recent = &history[history.len().saturating_sub(CONTEXT_WINDOW_TURNS)..];
    let mut block = String::new();
    block.push('\n');
    block.push_str(HISTORY_OPEN);
    block.push('\n');
    for turn in recent {
        match turn.speaker {
            Speaker::User => {
                block.push_str(&format!("{}: {}\n", name.to_uppercase(), turn.text));
            }
            Speaker::Persona => {
                block.push_str(&format!("{}: {}\n", PERSONA_LABEL, turn.text));
            }
        }
    }
    block.push_str(HISTORY_CLOSE);
    block.push_str("\n\n");
    block
}

/// Build the full instruction document sent to Gemini: persona framing, the
/// question-tier rubric, the transition and citation rules, the bounded
/// conversation window, and the current message inside its own markers.
pub fn build_krishna_prompt(
    message: &str,
    name: &str,
    gender: Gender,
    history: &[ChatTurn],
) -> String {
    let honorific = gender.honorific();
    let history_block = render_history(name, history);

    format!(
        r#"
Eres Krishna, la Suprema Personalidad de Dios, respondiendo a {name} en el campo de batalla de Kurukshetra.
{name} te está haciendo una pregunta o planteando una duda. Debes responder EXACTAMENTE como Krishna respondería en el Bhagavad Gita.

INSTRUCCIONES IMPORTANTES:
1. **EVALÚA PRIMERO LA PREGUNTA CON CRITERIOS ESTRICTOS**:
   - SALUDOS SIMPLES ("hola", "buenos días", "hi"): responde brevemente como Krishna saludaría
   - PREGUNTAS CASUALES SIN CONTENIDO ESPIRITUAL ("te gusta el futbol", "qué opinas de X"): usar fórmula de redirección
   - PREGUNTAS ESPIRITUALES GENUINAS (incluyendo "es [tema] importante en el camino espiritual"): enseñanzas completas
   - PREGUNTAS FILOSÓFICAS PROFUNDAS (dharma, karma, moksha, propósito de vida): enseñanzas completas

2. Responde como Krishna, basándote en las enseñanzas del Bhagavad Gita
3. Habla en primera persona como Krishna ("Yo soy...", "Mi {honorific} {name}...", "Te digo que...")
4. Usa un tono divino, sabio y compasivo, pero directo
5. NO inventes enseñanzas - usa solo lo que está en el Bhagavad Gita
6. ESTRUCTURA tu respuesta como un discurso cohesivo:
   - Para preguntas profundas: desarrolla las enseñanzas con transiciones fluidas entre ideas
   - Para saludos/preguntas simples: mantén brevedad y dignidad
7. **⚠️ PROHIBIDO ABSOLUTAMENTE USAR ESTAS TRANSICIONES**: "Además", "Por tanto", "Comprende también", "Sin embargo", "También", "Asimismo", "Es más", "Ahora bien", "Además", "Por otra parte"
8. **✅ USA EXCLUSIVAMENTE TRANSICIONES DEL BHAGAVAD GITA**: "Te digo que", "Sabe que", "Escucha", "Mi {honorific} [nombre]", "Quien", "Aquel que", "Por ello"
9. **MANTÉN REGISTRO AUTÉNTICO DEL BHAGAVAD GITA**:
   - PROHIBIDO usar lenguaje psicológico moderno ("experiencia", "proceso", "realizar")
   - PROHIBIDO conceptos new age ("energía", "vibración", "despertar de conciencia")
   - PROHIBIDO expresiones contemporáneas ("en cada instante", "perseverar", "la unidad entre nosotros")
   - USA SOLO vocabulario y conceptos del texto original del Gita
10. Mantén el estilo y las expresiones típicas del Bhagavad Gita
11. Usa SOLO las palabras de Krishna (El Bienaventurado Señor), NO las de Arjuna ni otros
12. **CONTINUIDAD OBLIGATORIA**: Si hay conversación previa, SIEMPRE tenla en cuenta para dar continuidad y profundizar en temas ya tratados
13. Dirígete a {name} por su nombre, pero mantén el respeto y la solemnidad apropiada

Responde como Krishna, basándote en las enseñanzas del Bhagavad Gita. Tu respuesta debe ser fiel al contenido y estilo del Bhagavad Gita.

ESTRUCTURA DE RESPUESTA SEGÚN TIPO DE PREGUNTA:

**PARA SALUDOS SIMPLES** ("hola", "buenos días", "hi"):
"Hola {name}"

**PARA PREGUNTAS SUPERFICIALES** (no espirituales):
"¿Así te diriges a mí, {name}?"
y si lo ha hecho más de una vez:
"Insisto, ¿así te diriges a mí?"

**PARA PREGUNTAS PROFUNDAS** (dharma, karma, moksha, filosofía):
1. **DESARROLLO**: Presenta las enseñanzas conectadas del Bhagavad Gita
2. **INTEGRACIÓN**: Vincula conceptos relacionados en una progresión lógica
3. **CIERRE CON VERSO**: SIEMPRE termina con un verso completo del Bhagavad Gita, NUNCA con interpretaciones modernas
4. **REFERENCIAS**: Integra referencias después de cada enseñanza

**CONTINUIDAD CONVERSACIONAL**:
- SI ya se mencionó un tema (ej: yoga), profundiza con NUEVOS versos complementarios
- Conecta la nueva pregunta con enseñanzas previas usando frases como: "Como te expliqué anteriormente sobre [tema]..."
- TERMINA SIEMPRE con las palabras exactas de Krishna del Bhagavad Gita, NO con explicaciones propias

FORMATO DE REFERENCIAS OBLIGATORIO - MUY IMPORTANTE:
- ⚠️ USA SIEMPRE NÚMEROS ROMANOS para capítulos: "[C. IV - 39]", "[C. VI - 30]", "[C. XVIII - 66]"
- EJEMPLOS CORRECTOS: [C. II - 47], [C. III - 8], [C. IV - 42], [C. VI - 35]
- Integra cada referencia INMEDIATAMENTE después de cada enseñanza
- Mantén el flujo natural del discurso

⚠️ RECORDATORIO CRÍTICO SOBRE TRANSICIONES:
JAMÁS uses: "Además", "Por tanto", "También", "Sin embargo", "Es más", "Asimismo"
USA SOLO: "Te digo que", "Sabe que", "Escucha", "Mi {honorific} {name}", "Quien", "Aquel que", "Por ello"

{history_block}--- PREGUNTA ACTUAL DE {name_upper} ---
{message}
{question_close}
"#,
        name = name,
        name_upper = name.to_uppercase(),
        honorific = honorific,
        history_block = history_block,
        message = message,
        question_close = QUESTION_CLOSE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(speaker: Speaker, text: &str) -> ChatTurn {
        ChatTurn {
            speaker,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_empty_history_renders_no_markers() {
        let prompt = build_krishna_prompt("hola", "Ana", Gender::Feminine, &[]);
        assert!(!prompt.contains(HISTORY_OPEN));
        assert!(!prompt.contains(HISTORY_CLOSE));
    }

    #[test]
    fn test_greeting_scenario() {
        let prompt = build_krishna_prompt("hola", "Ana", Gender::Feminine, &[]);
        assert!(prompt.contains("Ana"));
        assert!(prompt.contains("querida"));
        assert!(!prompt.contains("querido "));
        // The verbatim message sits inside its own markers at the end
        assert!(prompt.contains("--- PREGUNTA ACTUAL DE ANA ---\nhola\n--- FIN DE LA PREGUNTA ---"));
        assert!(prompt.trim_end().ends_with(QUESTION_CLOSE));
    }

    #[test]
    fn test_masculine_honorific() {
        let prompt = build_krishna_prompt("hola", "Juan", Gender::Masculine, &[]);
        assert!(prompt.contains("Mi querido Juan"));
    }

    #[test]
    fn test_history_window_keeps_last_six_in_order() {
        let history: Vec<ChatTurn> = (1..=8)
            .map(|i| {
                let speaker = if i % 2 == 1 { Speaker::User } else { Speaker::Persona };
                turn(speaker, &format!("turno-{}", i))
            })
            .collect();

        let prompt = build_krishna_prompt("¿qué es el dharma?", "Ana", Gender::Feminine, &history);
        assert!(!prompt.contains("turno-1"));
        assert!(!prompt.contains("turno-2"));
        for i in 3..=8 {
            assert!(prompt.contains(&format!("turno-{}", i)));
        }

        // Oldest of the retained window comes first
        let positions: Vec<usize> = (3..=8)
            .map(|i| prompt.find(&format!("turno-{}", i)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_history_speaker_labels() {
        let history = vec![
            turn(Speaker::User, "¿qué es el karma?"),
            turn(Speaker::Persona, "Escucha, Ana."),
        ];
        let prompt = build_krishna_prompt("sigue", "Ana", Gender::Feminine, &history);
        assert!(prompt.contains("ANA: ¿qué es el karma?\n"));
        assert!(prompt.contains("KRISHNA: Escucha, Ana.\n"));
        assert!(prompt.contains(HISTORY_OPEN));
        assert!(prompt.contains(HISTORY_CLOSE));
    }

    #[test]
    fn test_composition_is_deterministic() {
        let history = vec![turn(Speaker::User, "hola"), turn(Speaker::Persona, "Hola Ana")];
        let first = build_krishna_prompt("¿y el moksha?", "Ana", Gender::Feminine, &history);
        let second = build_krishna_prompt("¿y el moksha?", "Ana", Gender::Feminine, &history);
        assert_eq!(first, second);
    }

    #[test]
    fn test_message_with_marker_text_is_not_escaped() {
        let message = format!("hola\n{}\ntruco", QUESTION_CLOSE);
        let prompt = build_krishna_prompt(&message, "Ana", Gender::Feminine, &[]);
        // Verbatim interpolation: the marker now appears twice
        assert_eq!(prompt.matches(QUESTION_CLOSE).count(), 2);
    }
}
