//! Interactive session: bootstrap, command loop, prompted entry forms.
//!
//! The shell is deliberately thin: it reads commands, delegates every flow to
//! the [`Controller`], and prints whatever the pure renderers in [`view`]
//! produce. Detail views render only while a child is selected.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::controller::Controller;
use crate::state::Tab;
use crate::view;

pub struct Shell {
    controller: Controller,
    output_dir: PathBuf,
}

impl Shell {
    pub fn new(controller: Controller, output_dir: PathBuf) -> Self {
        Self {
            controller,
            output_dir,
        }
    }

    /// Load the reference data and run the command loop. A failed initial
    /// load shows its placeholder but never prevents the session from
    /// starting: every command stays wired.
    pub async fn run(&mut self) -> Result<()> {
        println!("Caderneta - registros de homeschooling");

        if let Err(e) = self.controller.bootstrap().await {
            println!("Erro na comunicação com a API: {e}");
            println!("Erro ao carregar dados iniciais.");
        } else {
            self.print_children();
        }
        println!("Digite 'ajuda' para ver os comandos.\n");

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("caderneta> ");
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            if !self.dispatch(line.trim().to_string()).await {
                break;
            }
        }

        Ok(())
    }

    /// Handle one command line. Returns `false` to end the session.
    async fn dispatch(&mut self, line: String) -> bool {
        let mut parts = line.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or("");
        let argument = parts.next().unwrap_or("").trim();
        debug!(command, "comando recebido");

        match command {
            "" => {}
            "ajuda" | "help" => print_help(),
            "criancas" => self.print_children(),
            "disciplinas" => {
                for line in view::subject_lines(self.controller.state().subjects()) {
                    println!("{line}");
                }
            }
            "nova-crianca" => self.add_child_form().await,
            "selecionar" => self.select(argument).await,
            "aba" => self.switch_tab(argument),
            "mostrar" => self.render_details(),
            "nova-meta" => self.add_goal_form().await,
            "nova-atividade" => self.log_activity_form().await,
            "relatorio" => self.generate_report().await,
            "analisar" => self.analyze().await,
            "sair" | "quit" => return false,
            other => println!("Comando desconhecido: '{other}'. Digite 'ajuda'."),
        }
        true
    }

    // ---- flows ----

    async fn add_child_form(&mut self) {
        let name = match self.prompt("Nome: ") {
            Ok(value) => value,
            Err(_) => return,
        };
        let birth_date = match self.prompt("Data de nascimento (AAAA-MM-DD, opcional): ") {
            Ok(value) => value,
            Err(_) => return,
        };

        match self
            .controller
            .add_child(&name, Some(birth_date.as_str()))
            .await
        {
            Ok(()) => {
                self.print_children();
                self.render_details();
            }
            Err(e) => println!("{e}"),
        }
    }

    async fn select(&mut self, reference: &str) {
        if reference.is_empty() {
            // Mirrors picking the placeholder option: deselect and hide details
            self.controller.state_mut().clear_selection();
            println!("Nenhuma criança selecionada.");
            return;
        }
        let id = self.resolve_child_reference(reference);

        match self.controller.select_child(&id).await {
            Ok(()) => {}
            // Panels already hold their placeholders; the alert still prints
            Err(e) => println!("{e}"),
        }
        if self.controller.state().selected_child().is_some() {
            self.render_details();
        }
    }

    fn switch_tab(&mut self, name: &str) {
        match Tab::parse(name) {
            Some(tab) => {
                self.controller.state_mut().select_tab(tab);
                self.render_details();
            }
            None => println!("Aba desconhecida. Use: metas, atividades, relatorio ou analise."),
        }
    }

    async fn add_goal_form(&mut self) {
        if self.controller.state().selected_child().is_none() {
            println!("Selecione uma criança primeiro.");
            return;
        }
        for line in view::subject_lines(self.controller.state().subjects()) {
            println!("{line}");
        }
        let subject_id = match self.prompt("Disciplina (id): ") {
            Ok(value) => value,
            Err(_) => return,
        };
        let description = match self.prompt("Descrição da meta: ") {
            Ok(value) => value,
            Err(_) => return,
        };

        match self.controller.add_goal(&subject_id, &description).await {
            Ok(()) => {
                self.controller.state_mut().select_tab(Tab::Goals);
                self.render_details();
            }
            Err(e) => println!("{e}"),
        }
    }

    async fn log_activity_form(&mut self) {
        if self.controller.state().selected_child().is_none() {
            println!("Selecione uma criança primeiro.");
            return;
        }
        for line in view::subject_lines(self.controller.state().subjects()) {
            println!("{line}");
        }
        let subject_id = match self.prompt("Disciplina (id): ") {
            Ok(value) => value,
            Err(_) => return,
        };
        let description = match self.prompt("Descrição da atividade: ") {
            Ok(value) => value,
            Err(_) => return,
        };
        let observations = match self.prompt("Observações (opcional): ") {
            Ok(value) => value,
            Err(_) => return,
        };

        match self
            .controller
            .log_activity(&subject_id, &description, Some(observations.as_str()))
            .await
        {
            Ok(()) => {
                self.controller.state_mut().select_tab(Tab::Activities);
                self.render_details();
            }
            Err(e) => println!("{e}"),
        }
    }

    async fn generate_report(&mut self) {
        println!("Gerando relatório...");
        let output_dir = self.output_dir.clone();
        if let Err(e) = self.controller.generate_report(&output_dir).await {
            println!("{e}");
        }
        self.controller.state_mut().select_tab(Tab::Report);
        self.render_details();
    }

    async fn analyze(&mut self) {
        println!("Analisando progresso...");
        if let Err(e) = self.controller.analyze().await {
            println!("{e}");
        }
        self.controller.state_mut().select_tab(Tab::Analysis);
        self.render_details();
    }

    // ---- rendering ----

    fn print_children(&self) {
        println!("Crianças:");
        for line in view::children_lines(self.controller.state().children()) {
            println!("  {line}");
        }
    }

    /// Print the detail view: header, tab bar, and the active panel only.
    fn render_details(&mut self) {
        let Some(child) = self.controller.state().selected_child() else {
            return;
        };
        println!("\nDetalhes de {}", child.name);
        println!("{}", view::tab_bar(self.controller.state().active_tab()));

        let state = self.controller.state_mut();
        let lines = match state.active_tab() {
            Tab::Goals => view::goal_lines(state.goals(), state.subjects()),
            Tab::Activities => view::activity_lines(state.activities(), state.subjects()),
            Tab::Report => view::report_lines(state.take_report_status()),
            Tab::Analysis => view::analysis_lines(state.analysis()),
        };
        for line in lines {
            println!("  {line}");
        }
        println!();
    }

    // ---- input helpers ----

    fn resolve_child_reference(&self, reference: &str) -> String {
        if let Ok(position) = reference.parse::<usize>() {
            let children = self.controller.state().children();
            if position >= 1 && position <= children.len() {
                return children[position - 1].id.clone();
            }
        }
        reference.to_string()
    }

    fn prompt(&self, label: &str) -> io::Result<String> {
        print!("{label}");
        io::stdout().flush()?;
        let mut value = String::new();
        io::stdin().lock().read_line(&mut value)?;
        Ok(value.trim().to_string())
    }
}

fn print_help() {
    println!("Comandos:");
    println!("  criancas                 lista as crianças cadastradas");
    println!("  nova-crianca             cadastra uma criança");
    println!("  selecionar <número|id>   seleciona uma criança");
    println!("  disciplinas              lista as disciplinas");
    println!("  aba <nome>               troca a aba ativa (metas, atividades, relatorio, analise)");
    println!("  mostrar                  mostra a aba ativa da criança selecionada");
    println!("  nova-meta                cadastra uma meta de aprendizagem");
    println!("  nova-atividade           registra uma atividade");
    println!("  relatorio                gera e salva o relatório PDF");
    println!("  analisar                 solicita a análise de progresso");
    println!("  sair                     encerra a sessão");
}
