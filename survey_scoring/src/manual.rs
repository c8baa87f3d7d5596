/*!

This is the long-form manual for `survey_scoring` and `surveytally`.

## Questions

Every question is declared with its prompt (the exact text of its column header)
and the ordered list of its canonical answers. The position of an answer in the
list is its index; filters and scoring configurations refer to answers by index.

Matching of cell contents is exact and case-sensitive, after trimming whitespace.
An empty or blank cell is recorded as *no answer*. Any other cell that matches nothing
is recorded as *unmatched*: it is excluded from every tally and listed in the
summary so that the list of answers can be corrected.

A question marked `optional` may be absent from the header. It is then skipped,
and every graph that uses it is skipped as well. Scoring or filtering on it
directly through the registry is a configuration error.

### Plain questions

One column, one answer per respondent.

### `select-all`

One column holding every selected answer, separated by `", "`:

|  Pets             |
|-------------------|
| cat, dog          |
| dog               |

Blank selections, such as the one after a trailing delimiter, are ignored. Each selection counts once, so the total of a select-all chart is the number of
selections, not the number of respondents. Answers containing `", "` cannot be
declared.

### `ranked`

Several columns sharing the same prompt, followed by a bracketed label:

| Favorite [1st] | Favorite [2nd] | Favorite [3rd] |
|----------------|----------------|----------------|
| tea            | coffee         | water          |

The rank positions follow the alphabetical order of the full header texts, not
the order of the columns in the file. A respondent who left one of the positions
empty, or wrote something unknown in one of them, is counted as not answering.

Ranked questions cannot be used as filters.

## Scoring

The scoring configuration names the question to score and may contain:

- `percentage`: report fractions of the total instead of counts. A chart with
  no responses at all reports zeros.
- `filters`: a list of `{id, answers}`; each filter keeps the respondents whose
  answer to question `id` is one of `answers`. An empty `answers` list keeps
  nobody.
- `sort-by`: the id of a question; the graph is replaced by one graph per answer
  of that question, each filtered on that answer and titled after it.

For ranked questions:

- by default, answers get Borda points: with `k` rank positions, first place is
  worth `k - 1` points, second place `k - 2`, and the last place 0.
- `ranks`: a list of positions (0 is first). Each answer gets one point per
  placement at one of these positions.
- `answer`: an answer index. The chart shows how many respondents placed this
  answer at each position.

The number of responses reported for a ranked chart is the number of
respondents that contributed to it.

## Grids

A graph with `nrows`, `ncols` and `sub-plots` draws its sub-plots on a grid.
Sub-plots may use `sort-by`; after expansion there must be exactly
`nrows * ncols` of them.

 */
