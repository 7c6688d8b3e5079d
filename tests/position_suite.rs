use serde::Deserialize;

use chess_search::{ChessPosition, Engine, Position, SearchConfig, TerminalReason, MATE_SCORE};

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    fen: String,
    moves: String,
}

impl Problem {
    /// Solution line as UCI moves
    fn line(&self) -> Vec<String> {
        self.moves
            .split(';')
            .filter(|mv| !mv.is_empty())
            .map(|mv| mv.replace('-', ""))
            .collect()
    }

    fn position(&self) -> ChessPosition {
        ChessPosition::from_fen(&self.fen).expect("invalid problem FEN")
    }
}

fn problems(kind: &str) -> Vec<Problem> {
    let data = include_str!("data/problems.json");
    let set: ProblemSet = serde_json::from_str(data).expect("invalid problems.json");
    let selected: Vec<Problem> = set.problems.into_iter().filter(|p| p.kind == kind).collect();
    assert!(!selected.is_empty(), "no {kind} problems");
    selected
}

#[test]
fn solution_lines_end_in_mate() {
    for kind in ["Mate in One", "Mate in Two"] {
        for problem in problems(kind) {
            let mut pos = problem.position();
            let line = problem.line();
            pos.play_uci_moves(line.iter().map(String::as_str))
                .expect("solution line is legal");
            assert_eq!(
                pos.terminal_state(),
                Some(TerminalReason::Checkmate),
                "line {} does not mate in {}",
                problem.moves,
                problem.fen
            );
        }
    }
}

#[test]
fn mate_in_one_suite() {
    for problem in problems("Mate in One") {
        let mut pos = problem.position();
        let outcome = Engine::new().search(&mut pos, SearchConfig::depth(3));
        let best = outcome.best_move.expect("a move");

        pos.push(best);
        assert_eq!(
            pos.terminal_state(),
            Some(TerminalReason::Checkmate),
            "{best} does not mate in {}",
            problem.fen
        );
        assert_eq!(outcome.score, MATE_SCORE - 1, "fen {}", problem.fen);
    }
}

#[test]
fn mate_in_two_suite() {
    for problem in problems("Mate in Two") {
        let mut pos = problem.position();
        let outcome = Engine::new().search(&mut pos, SearchConfig::depth(5));
        assert_eq!(outcome.score, MATE_SCORE - 3, "fen {}", problem.fen);
        assert_eq!(outcome.mate_in(), Some(2));
    }
}

#[test]
fn best_move_suite() {
    for problem in problems("Best Move") {
        let mut pos = problem.position();
        let outcome = Engine::new().search(&mut pos, SearchConfig::depth(4));
        let best = outcome.best_move.map(|mv| mv.to_string());
        assert_eq!(
            best.as_deref(),
            problem.line().first().map(String::as_str),
            "fen {}",
            problem.fen
        );
    }
}

#[test]
fn stalemate_suite() {
    for problem in problems("Stalemate") {
        let mut pos = problem.position();
        assert_eq!(pos.terminal_state(), Some(TerminalReason::Stalemate));

        let outcome = Engine::new().search(&mut pos, SearchConfig::depth(2));
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, 0);
    }
}
