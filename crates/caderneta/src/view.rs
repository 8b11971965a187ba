//! Pure renderers: one data collection in, display lines out.
//!
//! Each function fully re-derives its output on every call, so re-rendering
//! replaces prior content with no diffing. Nothing here touches the terminal
//! or the network, which keeps the rendering logic unit-testable.

use crate::state::{Panel, Tab};
use crate::types::{subject_name, Activity, AnalysisResult, Child, Goal, Subject};

/// One line per registered child, or a single placeholder when none exist.
pub fn children_lines(children: &[Child]) -> Vec<String> {
    if children.is_empty() {
        return vec!["Nenhuma criança cadastrada".to_string()];
    }
    children
        .iter()
        .enumerate()
        .map(|(idx, child)| format!("{}. {} ({})", idx + 1, child.name, child.id))
        .collect()
}

/// The subject options offered by the goal and activity entry forms.
pub fn subject_lines(subjects: &[Subject]) -> Vec<String> {
    let mut lines = vec!["Selecione a disciplina:".to_string()];
    lines.extend(
        subjects
            .iter()
            .map(|subject| format!("  {} - {}", subject.id, subject.name)),
    );
    lines
}

/// Goals panel: `[Subject] description (Status: ...)` per goal.
pub fn goal_lines(panel: &Panel<Vec<Goal>>, subjects: &[Subject]) -> Vec<String> {
    match panel {
        Panel::Empty => Vec::new(),
        Panel::Loading => vec!["Carregando metas...".to_string()],
        Panel::Failed => vec!["Erro ao carregar metas.".to_string()],
        Panel::Ready(goals) => {
            if goals.is_empty() {
                return vec!["Nenhuma meta cadastrada para esta criança.".to_string()];
            }
            goals
                .iter()
                .map(|goal| {
                    format!(
                        "[{}] {} (Status: {})",
                        subject_name(subjects, &goal.subject_id),
                        goal.description,
                        goal.status
                    )
                })
                .collect()
        }
    }
}

/// Activities panel, newest first. Sorting is stable, so activities sharing a
/// date keep the order the backend returned them in.
pub fn activity_lines(panel: &Panel<Vec<Activity>>, subjects: &[Subject]) -> Vec<String> {
    match panel {
        Panel::Empty => Vec::new(),
        Panel::Loading => vec!["Carregando atividades...".to_string()],
        Panel::Failed => vec!["Erro ao carregar atividades.".to_string()],
        Panel::Ready(activities) => {
            if activities.is_empty() {
                return vec!["Nenhuma atividade registrada para esta criança.".to_string()];
            }
            let mut sorted: Vec<&Activity> = activities.iter().collect();
            sorted.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));

            let mut lines = Vec::new();
            for activity in sorted {
                lines.push(format!(
                    "{} - [{}]: {}",
                    activity.formatted_date(),
                    subject_name(subjects, &activity.subject_id),
                    activity.description
                ));
                if let Some(obs) = activity.observations.as_deref() {
                    lines.push(format!("    Obs: {obs}"));
                }
            }
            lines
        }
    }
}

/// Analysis panel: summary plus up to three bulleted sections, each omitted
/// entirely when its list is empty.
pub fn analysis_lines(panel: &Panel<AnalysisResult>) -> Vec<String> {
    match panel {
        Panel::Empty => vec!["Use 'analisar' para solicitar uma análise de progresso.".to_string()],
        Panel::Loading => vec!["Analisando progresso...".to_string()],
        Panel::Failed => vec!["Erro ao obter análise.".to_string()],
        Panel::Ready(analysis) => {
            let mut lines = vec![
                format!("Resumo da Análise (ID: {})", analysis.analysis_id),
                analysis.summary.clone(),
            ];
            push_section(&mut lines, "Pontos Fortes:", &analysis.strengths);
            push_section(&mut lines, "Áreas para Atenção:", &analysis.areas_for_attention);
            push_section(&mut lines, "Sugestões:", &analysis.suggestions);
            lines
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(title.to_string());
    lines.extend(items.iter().map(|item| format!("  - {item}")));
}

/// Report panel: the transient status message if one is pending, otherwise a
/// usage hint.
pub fn report_lines(status: Option<String>) -> Vec<String> {
    match status {
        Some(message) => vec![message],
        None => vec!["Use 'relatorio' para gerar o PDF de progresso.".to_string()],
    }
}

/// The tab bar, with exactly the active tab bracketed.
pub fn tab_bar(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_subjects() -> Vec<Subject> {
        vec![
            Subject {
                id: "math".to_string(),
                name: "Matemática".to_string(),
                description: None,
            },
            Subject {
                id: "hist".to_string(),
                name: "História".to_string(),
                description: None,
            },
        ]
    }

    fn make_goal(id: &str, subject_id: &str, description: &str) -> Goal {
        Goal {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            description: description.to_string(),
            status: "Pendente".to_string(),
        }
    }

    fn make_activity(id: &str, date: &str, description: &str) -> Activity {
        Activity {
            id: id.to_string(),
            subject_id: "math".to_string(),
            description: description.to_string(),
            observations: None,
            activity_date: date.to_string(),
        }
    }

    // ========== children list tests ==========

    #[test]
    fn test_children_lines_empty_placeholder() {
        let lines = children_lines(&[]);
        assert_eq!(lines, vec!["Nenhuma criança cadastrada".to_string()]);
    }

    #[test]
    fn test_children_lines_one_per_child() {
        let children = vec![
            Child {
                id: "c1".to_string(),
                name: "Ana".to_string(),
                birth_date: None,
            },
            Child {
                id: "c2".to_string(),
                name: "Bruno".to_string(),
                birth_date: None,
            },
        ];
        let lines = children_lines(&children);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1. Ana (c1)");
        assert_eq!(lines[1], "2. Bruno (c2)");
    }

    // ========== goals panel tests ==========

    #[test]
    fn test_goal_lines_placeholders() {
        let subjects = make_subjects();
        assert_eq!(
            goal_lines(&Panel::Loading, &subjects),
            vec!["Carregando metas...".to_string()]
        );
        assert_eq!(
            goal_lines(&Panel::Failed, &subjects),
            vec!["Erro ao carregar metas.".to_string()]
        );
        assert_eq!(
            goal_lines(&Panel::Ready(vec![]), &subjects),
            vec!["Nenhuma meta cadastrada para esta criança.".to_string()]
        );
    }

    #[test]
    fn test_goal_lines_n_goals_n_rows() {
        let subjects = make_subjects();
        let goals = vec![
            make_goal("g1", "math", "Frações"),
            make_goal("g2", "hist", "Brasil Colônia"),
            make_goal("g3", "math", "Tabuada"),
        ];
        let lines = goal_lines(&Panel::Ready(goals), &subjects);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "[Matemática] Frações (Status: Pendente)");
    }

    #[test]
    fn test_goal_lines_unknown_subject_renders_desconhecida() {
        let subjects = make_subjects();
        let goals = vec![make_goal("g1", "ghost", "Meta órfã")];
        let lines = goal_lines(&Panel::Ready(goals), &subjects);

        assert_eq!(lines[0], "[Desconhecida] Meta órfã (Status: Pendente)");
    }

    // ========== activities panel tests ==========

    #[test]
    fn test_activity_lines_sorted_descending() {
        let subjects = make_subjects();
        let activities = vec![
            make_activity("a1", "2025-01-10T09:00:00Z", "Antiga"),
            make_activity("a2", "2025-01-20T09:00:00Z", "Recente"),
            make_activity("a3", "2025-01-15T09:00:00Z", "Meio"),
        ];
        let lines = activity_lines(&Panel::Ready(activities), &subjects);

        assert_eq!(lines[0], "20/01/2025 - [Matemática]: Recente");
        assert_eq!(lines[1], "15/01/2025 - [Matemática]: Meio");
        assert_eq!(lines[2], "10/01/2025 - [Matemática]: Antiga");
    }

    #[test]
    fn test_activity_lines_stable_for_equal_dates() {
        let subjects = make_subjects();
        let activities = vec![
            make_activity("a1", "2025-01-15T09:00:00Z", "Primeira"),
            make_activity("a2", "2025-01-15T09:00:00Z", "Segunda"),
        ];
        let lines = activity_lines(&Panel::Ready(activities), &subjects);

        // Same timestamp: backend order preserved
        assert!(lines[0].ends_with("Primeira"));
        assert!(lines[1].ends_with("Segunda"));
    }

    #[test]
    fn test_activity_lines_observations_indented() {
        let subjects = make_subjects();
        let mut activity = make_activity("a1", "2025-01-15T09:00:00Z", "Experimento");
        activity.observations = Some("Muito interesse".to_string());
        let lines = activity_lines(&Panel::Ready(vec![activity]), &subjects);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "    Obs: Muito interesse");
    }

    #[test]
    fn test_activity_lines_empty_placeholder() {
        let lines = activity_lines(&Panel::Ready(vec![]), &make_subjects());
        assert_eq!(
            lines,
            vec!["Nenhuma atividade registrada para esta criança.".to_string()]
        );
    }

    // ========== analysis panel tests ==========

    #[test]
    fn test_analysis_lines_omits_empty_sections() {
        let analysis = AnalysisResult {
            analysis_id: "an1".to_string(),
            summary: "Bom progresso.".to_string(),
            strengths: vec!["História".to_string()],
            areas_for_attention: vec![],
            suggestions: vec![],
        };
        let lines = analysis_lines(&Panel::Ready(analysis));

        assert_eq!(lines[0], "Resumo da Análise (ID: an1)");
        assert!(lines.iter().any(|l| l == "Pontos Fortes:"));
        assert!(!lines.iter().any(|l| l == "Áreas para Atenção:"));
        assert!(!lines.iter().any(|l| l == "Sugestões:"));
    }

    #[test]
    fn test_analysis_lines_all_sections() {
        let analysis = AnalysisResult {
            analysis_id: "an1".to_string(),
            summary: "Resumo.".to_string(),
            strengths: vec!["a".to_string()],
            areas_for_attention: vec!["b".to_string()],
            suggestions: vec!["c".to_string(), "d".to_string()],
        };
        let lines = analysis_lines(&Panel::Ready(analysis));

        assert!(lines.contains(&"  - a".to_string()));
        assert!(lines.contains(&"  - b".to_string()));
        assert!(lines.contains(&"  - c".to_string()));
        assert!(lines.contains(&"  - d".to_string()));
    }

    #[test]
    fn test_analysis_lines_failed_placeholder() {
        let lines = analysis_lines(&Panel::Failed);
        assert_eq!(lines, vec!["Erro ao obter análise.".to_string()]);
    }

    // ========== report panel tests ==========

    #[test]
    fn test_report_lines_status_shown() {
        let lines = report_lines(Some("Relatório gerado e download iniciado!".to_string()));
        assert_eq!(lines, vec!["Relatório gerado e download iniciado!".to_string()]);
    }

    #[test]
    fn test_report_lines_hint_without_status() {
        let lines = report_lines(None);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("relatorio"));
    }

    // ========== tab bar tests ==========

    #[test]
    fn test_tab_bar_exactly_one_active() {
        let bar = tab_bar(Tab::Activities);

        assert!(bar.contains("[Atividades]"));
        assert_eq!(bar.matches('[').count(), 1);
        assert!(bar.contains(" Metas "));
    }

    #[test]
    fn test_tab_bar_moves_active_marker() {
        let first = tab_bar(Tab::Goals);
        let second = tab_bar(Tab::Report);

        assert!(first.contains("[Metas]"));
        assert!(!second.contains("[Metas]"));
        assert!(second.contains("[Relatório]"));
    }

    // ========== subject options tests ==========

    #[test]
    fn test_subject_lines_header_first() {
        let lines = subject_lines(&make_subjects());

        assert_eq!(lines[0], "Selecione a disciplina:");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Matemática"));
    }
}
