/// Role given to the model on every request.
pub const SYSTEM_PROMPT: &str = "You are a professional math teacher.";

pub const SAT_MATH_ANALYZER_PROMPT: &str = "\
Analyze the SAT math question in this image and classify it using the SAT Math taxonomy.

Topics are one or more of: \"Algebra\", \"Advanced Math\", \
\"Problem-Solving and Data Analysis\", \"Geometry and Trigonometry\".
Sub-topics are the specific skills tested, for example \"Linear equations in one variable\", \
\"Nonlinear functions\", \"Ratios, rates, proportional relationships, and units\", \
\"Circles\" or \"Right triangles and trigonometry\".

Solve the question, then reply with a single JSON object and nothing else:
{
  \"answer\": \"final answer or choice (A, B, C, D)\",
  \"topic\": [\"topic\"],
  \"sub_topic\": [\"sub-topic\"],
  \"difficulty\": \"easy | medium | hard\",
  \"question_type\": \"multiple_choice | free_response\"
}";

pub const SIMILAR_QUESTION_PROMPT: &str = "\
Read the SAT math question in this image. Write three new practice questions that test \
the same skill at the same difficulty. Use the same format as the original \
(multiple choice with options A-D, or free response). After each question give the \
correct answer and a one-sentence explanation.";
