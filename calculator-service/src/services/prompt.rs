//! Instruction prompt sent alongside every canvas image.

use serde_json::{Map, Value};

/// One family of problems the model may find on the canvas.
#[derive(Debug, Clone, Copy)]
pub struct ProblemRule {
    pub title: &'static str,
    pub guidance: &'static str,
    pub answer_shape: &'static str,
}

pub const PROBLEM_RULES: [ProblemRule; 12] = [
    ProblemRule {
        title: "Simple arithmetic",
        guidance: "Expressions such as \"2 + 2\", \"3 * 4\", \"5 / 6\" or \"7 - 8\". Evaluate them with the precedence order above.",
        answer_shape: r#"[{"expr": "the expression as written", "result": "the value"}]"#,
    },
    ProblemRule {
        title: "Systems of equations",
        guidance: "Several equations sharing unknowns, e.g. \"x^2 + 2x + 1 = 0\" and \"3y + 4x = 0\". Solve by substitution or elimination and report every unknown separately.",
        answer_shape: r#"{"expr": "variable", "result": "value", "assign": true}, one dict per variable"#,
    },
    ProblemRule {
        title: "Variable assignments",
        guidance: "Statements like \"x = 4\" or \"y = 5\". Record each value exactly as assigned.",
        answer_shape: r#"{"expr": "variable", "result": "value", "assign": true}, one dict per assignment"#,
    },
    ProblemRule {
        title: "Graphical problems",
        guidance: "Drawn figures such as triangles, angles, graphs or motion diagrams. Read the labels, lengths, angles and colours, pick the formula the figure calls for (Pythagoras, trigonometric ratios, rates) and solve.",
        answer_shape: r#"[{"expr": "expression derived from the drawing", "result": "the value"}]"#,
    },
    ProblemRule {
        title: "Abstract concepts in drawings",
        guidance: "Pictures that symbolise an idea such as love, patriotism or war. Interpret the symbols and characters and name the idea.",
        answer_shape: r#"[{"expr": "what the drawing shows", "result": "the concept it represents"}]"#,
    },
    ProblemRule {
        title: "Quadratic equations with real roots",
        guidance: "Equations like \"x^2 - 4x + 3 = 0\". Rewrite as ax^2 + bx + c = 0 and apply x = (-b ± √(b² - 4ac)) / (2a).",
        answer_shape: r#"{"expr": "x", "result": "root", "assign": true}, one dict per root"#,
    },
    ProblemRule {
        title: "Quadratic equations with imaginary roots",
        guidance: "Equations like \"x^2 + x + 1 = 0\" where b² - 4ac < 0. Apply the quadratic formula and keep the imaginary part, written with i.",
        answer_shape: r#"{"expr": "x", "result": "root with i", "assign": true}, one dict per root"#,
    },
    ProblemRule {
        title: "Trigonometric expressions",
        guidance: "Expressions like \"sin(30)\", \"cos(45)\" or \"tan(x)\". Use exact values for standard angles and identities such as sin²(x) + cos²(x) = 1 otherwise. Angles are radians unless degrees are marked.",
        answer_shape: r#"[{"expr": "the expression as written", "result": "the value"}]"#,
    },
    ProblemRule {
        title: "Logarithmic expressions",
        guidance: "Expressions like \"log(10)\", \"ln(1)\" or \"log_base(64, 2)\". log is base 10, ln is base e, log_base(a, b) is the logarithm of a in base b. Combine terms with the product and quotient rules.",
        answer_shape: r#"[{"expr": "the expression as written", "result": "the value"}]"#,
    },
    ProblemRule {
        title: "Derivatives",
        guidance: "Expressions like \"d/dx (x^3)\" or \"f'(x)\" for a given f. Differentiate symbolically; evaluate at a point when one is given.",
        answer_shape: r#"[{"expr": "the expression as written", "result": "the derivative or its value"}]"#,
    },
    ProblemRule {
        title: "Integrals",
        guidance: "Definite or indefinite integrals such as \"∫ 2x dx\" or \"∫ from 0 to 1 of x^2 dx\". Add + C to indefinite results; evaluate definite ones to a number.",
        answer_shape: r#"[{"expr": "the expression as written", "result": "the antiderivative or its value"}]"#,
    },
    ProblemRule {
        title: "Limits",
        guidance: "Expressions like \"lim x→0 sin(x)/x\". Simplify or apply L'Hôpital's rule; say \"does not exist\" or \"∞\" where appropriate.",
        answer_shape: r#"[{"expr": "the expression as written", "result": "the limit"}]"#,
    },
];

const PREAMBLE: &str = "\
You are given an image containing mathematical expressions, equations or graphical problems. Analyse and solve every one of them.
Evaluate expressions with this precedence: parentheses first, then exponents, then multiplication and division from left to right, then addition and subtraction from left to right.
If a range is given for a variable, respect it; otherwise solve the problem in general.
The problems fall into the following categories:";

const CLOSING: &str = "\
Answer every expression or equation in the image according to these rules.
Escape backslashes in the output, e.g. \\f becomes \\\\f and \\n becomes \\\\n.";

const FORMAT_RULES: &str = "\
DO NOT USE BACKTICKS OR MARKDOWN FORMATTING.
Reply with a single JSON array of dicts and quote every key and every string value with double quotes so the reply parses as strict JSON.";

/// Build the prompt, embedding the caller's variables as compact JSON.
pub fn build_prompt(dict_of_vars: &Map<String, Value>) -> String {
    let mut prompt = String::with_capacity(6 * 1024);
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n");

    for (index, rule) in PROBLEM_RULES.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {}:\n{}\nReturn format: {}.\n\n",
            index + 1,
            rule.title,
            rule.guidance,
            rule.answer_shape
        ));
    }

    prompt.push_str(CLOSING);
    prompt.push_str("\n\n");
    prompt.push_str(
        "Here is a dictionary of variables the user has already assigned. \
         If an expression uses one of these variables, substitute its value from this dictionary: ",
    );
    prompt.push_str(&vars_json(dict_of_vars));
    prompt.push_str(".\n");
    prompt.push_str(FORMAT_RULES);
    prompt
}

fn vars_json(dict_of_vars: &Map<String, Value>) -> String {
    // A map of JSON values always serialises.
    serde_json::to_string(dict_of_vars).unwrap_or_else(|_| "{}".to_string())
}
