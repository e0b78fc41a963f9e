//! 内置启发式评分器
//!
//! 不依赖外部服务，按提交内容的结构特征打分并生成文字反馈。
//! 作为默认评分后端，也是外部评分器不可用时的兜底选择。

use async_trait::async_trait;

use crate::declare_grader_plugin;
use crate::errors::Result;
use crate::grading::grader::{Grader, GraderRequest, GraderVerdict};

declare_grader_plugin!("heuristic", HeuristicGrader);

pub struct HeuristicGrader;

impl HeuristicGrader {
    pub fn new() -> std::result::Result<Self, String> {
        Ok(Self)
    }
}

impl Default for HeuristicGrader {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl Grader for HeuristicGrader {
    async fn score(&self, request: GraderRequest) -> Result<GraderVerdict> {
        let content = String::from_utf8_lossy(&request.content);

        // 空文件或纯二进制内容没有可分析的结构
        if content.trim().is_empty() {
            return Ok(GraderVerdict {
                score: 20.0,
                feedback: format!(
                    "The submitted file '{}' appears to be empty or unreadable. \
                     Please verify the file and ask for a manual review.",
                    request.file_name
                ),
            });
        }

        let non_empty_lines = content.lines().filter(|l| !l.trim().is_empty()).count();
        let has_functions = content.contains("def ")
            || content.contains("fn ")
            || content.contains("function")
            || content.contains("class ");
        let has_imports = content.contains("import ")
            || content.contains("#include")
            || content.contains("use ");
        let comment_marks =
            content.matches('#').count() + content.matches("//").count() + content.matches("/*").count();

        let mut score: f64 = 60.0;
        let mut notes = Vec::new();

        notes.push(format!(
            "Submission contains {non_empty_lines} non-empty lines."
        ));

        if has_functions {
            score += 10.0;
            notes.push("Code defines functions or types, which indicates structure.".to_string());
        }
        if has_imports {
            score += 5.0;
            notes.push("Code makes use of imports or libraries.".to_string());
        }
        if comment_marks > 0 {
            score += 5.0;
            notes.push("Code includes comments.".to_string());
        }

        if non_empty_lines > 10 {
            score += 5.0;
        } else if non_empty_lines < 3 {
            score -= 10.0;
            notes.push(
                "The submission is very short; make sure all requirements are covered.".to_string(),
            );
        }

        // 有效提交保底 30 分，封顶 100 分
        let score = score.clamp(30.0, 100.0);

        let feedback = format!(
            "Automated review of '{}' for assignment '{}':\n{}",
            request.file_name,
            request.assignment_title,
            notes
                .iter()
                .map(|n| format!("- {n}"))
                .collect::<Vec<_>>()
                .join("\n")
        );

        Ok(GraderVerdict { score, feedback })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_content(content: &[u8]) -> GraderRequest {
        GraderRequest {
            assignment_title: "Lab 1".to_string(),
            assignment_description: None,
            file_name: "main.py".to_string(),
            content: content.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_empty_content_scores_low() {
        let grader = HeuristicGrader::default();
        let verdict = grader.score(request_with_content(b"")).await.unwrap();
        assert_eq!(verdict.score, 20.0);
        assert!(verdict.feedback.contains("empty"));
    }

    #[tokio::test]
    async fn test_structured_code_scores_higher() {
        let grader = HeuristicGrader::default();
        let code = b"import os\n\n# entry point\ndef main():\n    print('hi')\n\n\
                     def helper(x):\n    return x * 2\n\nmain()\nhelper(1)\nhelper(2)\nhelper(3)\n";
        let verdict = grader.score(request_with_content(code)).await.unwrap();
        assert!(verdict.score > 60.0);
        assert!(verdict.score <= 100.0);
    }

    #[tokio::test]
    async fn test_score_always_in_range() {
        let grader = HeuristicGrader::default();
        for content in [&b"x"[..], &b"a = 1\n"[..], &b"def f():\n    pass\n"[..]] {
            let verdict = grader.score(request_with_content(content)).await.unwrap();
            assert!((0.0..=100.0).contains(&verdict.score));
        }
    }
}
